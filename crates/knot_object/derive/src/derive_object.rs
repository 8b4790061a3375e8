use proc_macro2::TokenStream;
use quote::{quote, quote_spanned};
use syn::{Data, DeriveInput, Fields, Ident, LitStr, Member, Path, Type};

use crate::attributes::{FieldAttributes, FieldRole, TypeAttributes};

// -----------------------------------------------------------------------------
// Parsed input

struct Property {
    member: Member,
    name: LitStr,
}

struct Special {
    member: Member,
    ty: Type,
}

/// A named struct, split by field role.
pub(crate) struct ObjectStruct<'a> {
    input: &'a DeriveInput,
    attrs: TypeAttributes,
    properties: Vec<Property>,
    parent: Option<Special>,
    dynamic: Option<Special>,
    knot_object_path: Path,
}

impl<'a> ObjectStruct<'a> {
    pub fn parse(input: &'a DeriveInput) -> syn::Result<Self> {
        let Data::Struct(data) = &input.data else {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "`Object` can only be derived for structs",
            ));
        };
        let Fields::Named(fields) = &data.fields else {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "`Object` can only be derived for structs with named fields",
            ));
        };

        let attrs = TypeAttributes::parse_attrs(&input.attrs)?;
        let mut properties = Vec::new();
        let mut parent = None;
        let mut dynamic = None;

        for field in &fields.named {
            let field_attrs = FieldAttributes::parse_attrs(&field.attrs)?;
            let Some(ident) = &field.ident else { continue };
            let member = Member::Named(ident.clone());

            let slot = match field_attrs.role {
                FieldRole::Skip => continue,
                FieldRole::Property => {
                    let name = field_attrs
                        .rename
                        .unwrap_or_else(|| LitStr::new(&unraw(ident), ident.span()));
                    if properties.iter().any(|p: &Property| p.name.value() == name.value()) {
                        return Err(syn::Error::new_spanned(&name, "duplicate property name"));
                    }
                    properties.push(Property { member, name });
                    continue;
                }
                FieldRole::Parent => &mut parent,
                FieldRole::Dynamic => &mut dynamic,
            };
            if slot.is_some() {
                return Err(syn::Error::new_spanned(
                    field,
                    "at most one `parent` and one `dynamic` field are allowed",
                ));
            }
            *slot = Some(Special {
                member,
                ty: field.ty.clone(),
            });
        }

        Ok(Self {
            input,
            attrs,
            properties,
            parent,
            dynamic,
            knot_object_path: crate::knot_object_path(),
        })
    }

    fn type_name(&self) -> LitStr {
        match &self.attrs.name {
            Some(name) => name.clone(),
            None => LitStr::new(&unraw(&self.input.ident), self.input.ident.span()),
        }
    }

    // -------------------------------------------------------------------------
    // Code generation

    pub fn expand(&self) -> TokenStream {
        let object_impl = self.object_impl();
        let object_type_impl = self.object_type_impl();
        let auto_register = self.auto_register_impl();
        quote! {
            #object_impl
            #object_type_impl
            #auto_register
        }
    }

    fn object_impl(&self) -> TokenStream {
        let knot = &self.knot_object_path;
        let ident = &self.input.ident;
        let (impl_generics, ty_generics, where_clause) = self.input.generics.split_for_impl();

        let names: Vec<&LitStr> = self.properties.iter().map(|p| &p.name).collect();
        let members: Vec<&Member> = self.properties.iter().map(|p| &p.member).collect();

        let field_fallback = match &self.parent {
            Some(Special { member, ty }) => quote! {
                <#ty as #knot::Object>::field(&self.#member, name)
            },
            None => quote! { ::core::option::Option::None },
        };
        let set_field_fallback = match &self.parent {
            Some(Special { member, ty }) => quote! {
                <#ty as #knot::Object>::set_field(&mut self.#member, name, value)
            },
            None => quote! {
                ::core::result::Result::Err(#knot::FieldError::NotFound(value))
            },
        };

        let parent_methods = self.parent.as_ref().map(|Special { member, .. }| {
            quote! {
                #[inline]
                fn parent(&self) -> ::core::option::Option<&dyn #knot::Object> {
                    ::core::option::Option::Some(&self.#member)
                }

                #[inline]
                fn parent_mut(&mut self) -> ::core::option::Option<&mut dyn #knot::Object> {
                    ::core::option::Option::Some(&mut self.#member)
                }
            }
        });

        // A level without its own store exposes the store of its parent.
        let dynamic_methods = match (&self.dynamic, &self.parent) {
            (Some(Special { member, .. }), _) => Some(quote! {
                #[inline]
                fn dynamic_fields(&self) -> ::core::option::Option<&#knot::Properties> {
                    ::core::option::Option::Some(&self.#member)
                }

                #[inline]
                fn dynamic_fields_mut(&mut self) -> ::core::option::Option<&mut #knot::Properties> {
                    ::core::option::Option::Some(&mut self.#member)
                }
            }),
            (None, Some(Special { member, ty })) => Some(quote! {
                #[inline]
                fn dynamic_fields(&self) -> ::core::option::Option<&#knot::Properties> {
                    <#ty as #knot::Object>::dynamic_fields(&self.#member)
                }

                #[inline]
                fn dynamic_fields_mut(&mut self) -> ::core::option::Option<&mut #knot::Properties> {
                    <#ty as #knot::Object>::dynamic_fields_mut(&mut self.#member)
                }
            }),
            (None, None) => None,
        };

        // Without its own hook a level inherits the hook of its parent.
        let wakeup_method = match (&self.attrs.wakeup, &self.parent) {
            (Some(path), _) => Some(quote! {
                #[inline]
                fn wakeup(&mut self) {
                    #path(self)
                }
            }),
            (None, Some(Special { member, ty })) => Some(quote! {
                #[inline]
                fn wakeup(&mut self) {
                    <#ty as #knot::Object>::wakeup(&mut self.#member)
                }
            }),
            (None, None) => None,
        };

        quote! {
            impl #impl_generics #knot::Object for #ident #ty_generics #where_clause {
                #[inline]
                fn type_name(&self) -> &'static str {
                    <Self as #knot::ObjectType>::TYPE_NAME
                }

                #[inline]
                fn field_names(&self) -> &'static [&'static str] {
                    &[#(#names),*]
                }

                fn field(&self, name: &str) -> ::core::option::Option<#knot::Value> {
                    match name {
                        #(#names => ::core::option::Option::Some(
                            #knot::__macro_exports::ToValue::to_value(&self.#members)
                        ),)*
                        _ => #field_fallback,
                    }
                }

                fn set_field(
                    &mut self,
                    name: &str,
                    value: #knot::Value,
                ) -> ::core::result::Result<(), #knot::FieldError> {
                    match name {
                        #(#names => {
                            self.#members = #knot::__macro_exports::FromValue::from_value(value)
                                .map_err(|source| #knot::FieldError::Convert { field: #names, source })?;
                            ::core::result::Result::Ok(())
                        })*
                        _ => #set_field_fallback,
                    }
                }

                #parent_methods
                #dynamic_methods
                #wakeup_method
            }
        }
    }

    fn object_type_impl(&self) -> TokenStream {
        let knot = &self.knot_object_path;
        let ident = &self.input.ident;
        let (impl_generics, ty_generics, where_clause) = self.input.generics.split_for_impl();
        let type_name = self.type_name();

        let blank = match &self.attrs.blank {
            Some(path) => quote! { #path() },
            None => quote! { <Self as ::core::default::Default>::default() },
        };

        quote! {
            impl #impl_generics #knot::ObjectType for #ident #ty_generics #where_clause {
                const TYPE_NAME: &'static str = #type_name;

                fn type_meta() -> #knot::TypeMeta {
                    #knot::TypeMeta::with_blank(
                        <Self as #knot::ObjectType>::TYPE_NAME,
                        || ::std::boxed::Box::new(#blank),
                    )
                }
            }
        }
    }

    #[cfg(feature = "auto_register")]
    fn auto_register_impl(&self) -> TokenStream {
        let Some(span) = self.attrs.auto_register else {
            return TokenStream::new();
        };
        // Generic types have no single registration.
        if !self.input.generics.params.is_empty() {
            return TokenStream::new();
        }

        let knot = &self.knot_object_path;
        let ident = &self.input.ident;
        quote_spanned! { span =>
            #knot::__macro_exports::auto_register::inventory::submit! {
                #knot::__macro_exports::auto_register::__AutoRegisterFunc(
                    <#ident as #knot::__macro_exports::auto_register::__RegisterType>::__register
                )
            }
        }
    }

    #[cfg(not(feature = "auto_register"))]
    fn auto_register_impl(&self) -> TokenStream {
        TokenStream::new()
    }
}

fn unraw(ident: &Ident) -> String {
    let text = ident.to_string();
    match text.strip_prefix("r#") {
        Some(stripped) => stripped.to_owned(),
        None => text,
    }
}
