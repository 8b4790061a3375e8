#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use knot_object as object;
pub use knot_serial as serial;
pub use knot_utils as utils;
