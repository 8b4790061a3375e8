//! Scenario tests across the walker, the driver and the strategies.

use std::sync::Arc;

use knot_object::derive::Object;
use knot_object::{ObjectId, Properties, TypeRegistry};

use crate::{Serializer, SerializerConfig, Strategy};

mod builtin;
mod errors;
mod formats;

// -----------------------------------------------------------------------------
// Fixtures

#[derive(Object, Default, Debug, PartialEq)]
struct Point {
    x: i64,
    y: i64,
}

#[derive(Object, Default)]
struct Pair {
    left: Option<ObjectId>,
    right: Option<ObjectId>,
}

#[derive(Object, Default)]
struct Link {
    label: String,
    next: Option<ObjectId>,
}

#[derive(Object, Default)]
struct Entity {
    id: i64,
    label: String,
}

#[derive(Object, Default)]
#[object(name = "app.Account", wakeup = Account::wake)]
struct Account {
    label: String,
    tags: Vec<String>,
    #[object(parent)]
    entity: Entity,
    #[object(dynamic)]
    extra: Properties,
    #[object(skip)]
    tag_count: Option<usize>,
}

impl Account {
    fn wake(&mut self) {
        self.tag_count = Some(self.tags.len());
    }
}

fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry.register::<Point>();
    registry.register::<Pair>();
    registry.register::<Link>();
    registry.register::<Entity>();
    registry.register::<Account>();
    registry
}

fn serializer<S: Strategy>(strategy: S) -> Serializer<S> {
    Serializer::with_registry(strategy, Arc::new(registry()))
}

fn configured<S: Strategy>(strategy: S, config: SerializerConfig) -> Serializer<S> {
    serializer(strategy).with_config(config)
}
