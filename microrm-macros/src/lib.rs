mod column_trait;
mod decode_field;
mod decode_model;
mod from_row_trait;
mod table_name;
mod text_enum;

use column_trait::column_trait;
use decode_model::{ModelMetadata, decode_model};
use from_row_trait::from_row_body;
use proc_macro::TokenStream;
use quote::quote;
use syn::{ItemEnum, ItemStruct, parse_macro_input};
use text_enum::text_enum;

/// Implement `microrm::Model` for a struct with named fields.
///
/// Type attributes: `#[table_name("..")]` and
/// `#[microrm(table = "..", pk = "field" | none, unique = "a" | unique("a", "b"))]`.
/// Field attribute: `#[microrm(surrogate)]` marks the `Option<i64>` field that
/// holds the implicit `id` key.
#[proc_macro_derive(Model, attributes(table_name, microrm))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let item = parse_macro_input!(input as ItemStruct);
    match decode_model(item) {
        Ok(model) => encode_model(&model).into(),
        Err(e) => e.to_compile_error().into(),
    }
}

/// Implement `microrm::AsValue` for a unit-only enum stored as text.
#[proc_macro_derive(TextEnum, attributes(microrm))]
pub fn derive_text_enum(input: TokenStream) -> TokenStream {
    let item = parse_macro_input!(input as ItemEnum);
    match text_enum(item) {
        Ok(v) => v.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn encode_model(model: &ModelMetadata) -> proc_macro2::TokenStream {
    let name = &model.item.ident;
    let type_name = name.to_string();
    let field_defs = model.fields.iter().map(|f| {
        let column = &f.name;
        let ty = &f.ty;
        quote!(::microrm::FieldDef::new(#column, <#ty as ::microrm::AsValue>::FIELD_TYPE))
    });
    let quote_option = |v: &Option<String>| match v {
        Some(v) => quote!(Some(#v)),
        None => quote!(None),
    };
    let table = quote_option(&model.table);
    let table_name = quote_option(&model.table_name);
    let primary_key = quote_option(&model.primary_key);
    let unique = (!model.unique.is_empty()).then(|| {
        let unique = &model.unique;
        quote!(.with_unique([#(#unique),*]))
    });
    let values = model.fields.iter().map(|f| {
        let ident = &f.ident;
        quote!(::microrm::AsValue::as_value(::std::clone::Clone::clone(&self.#ident)))
    });
    let (primary_key_get, primary_key_set) = match model.primary_key_field() {
        Some(field) => {
            let ident = &field.ident;
            (
                quote!(::microrm::AsValue::as_value(::std::clone::Clone::clone(&self.#ident))),
                quote! {
                    self.#ident = ::microrm::AsValue::try_from_value(value)?;
                    Ok(())
                },
            )
        }
        None => (
            quote!(::microrm::Value::Null),
            quote! {
                let _ = value;
                Ok(())
            },
        ),
    };
    let from_row = from_row_body(model);
    let columns = column_trait(model);
    quote! {
        #columns
        impl ::microrm::Model for #name {
            fn descriptor() -> &'static ::microrm::ModelDescriptor {
                static DESCRIPTOR: ::std::sync::LazyLock<::microrm::ModelDescriptor> =
                    ::std::sync::LazyLock::new(|| {
                        let fields: ::std::vec::Vec<::microrm::FieldDef> = vec![#(#field_defs),*];
                        ::microrm::ModelDescriptor::new(#type_name, fields)
                            .with_table(#table, #table_name)
                            .with_primary_key(#primary_key)
                            #unique
                    });
                &DESCRIPTOR
            }

            fn row(&self) -> ::std::vec::Vec<::microrm::Value> {
                vec![#(#values),*]
            }

            #[allow(unused_mut)]
            fn from_row(mut row: ::microrm::RowLabeled) -> ::microrm::Result<Self> {
                #from_row
            }

            fn primary_key(&self) -> ::microrm::Value {
                #primary_key_get
            }

            fn set_primary_key(&mut self, value: ::microrm::Value) -> ::microrm::Result<()> {
                #primary_key_set
            }
        }
    }
}
