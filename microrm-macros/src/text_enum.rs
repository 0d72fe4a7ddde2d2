use proc_macro2::TokenStream;
use quote::quote;
use syn::{Error, Fields, ItemEnum, LitStr, Result, spanned::Spanned};

/// `AsValue` for a unit-only enum, stored as the variant name (or the
/// `#[microrm(value = "..")]` override).
pub(crate) fn text_enum(item: ItemEnum) -> Result<TokenStream> {
    if !item.generics.params.is_empty() {
        return Err(Error::new(item.generics.span(), "Text enums cannot be generic"));
    }
    if item.variants.is_empty() {
        return Err(Error::new(item.ident.span(), "Text enums need at least one variant"));
    }
    let name = &item.ident;
    let mut variants = Vec::with_capacity(item.variants.len());
    for variant in &item.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(Error::new(
                variant.span(),
                "Text enums can only have unit variants",
            ));
        }
        let mut value = variant.ident.to_string();
        for attr in &variant.attrs {
            if !attr.path().is_ident("microrm") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("value") {
                    value = meta.value()?.parse::<LitStr>()?.value();
                    Ok(())
                } else {
                    Err(meta.error("Unknown attribute inside microrm macro, expected `value`"))
                }
            })?;
        }
        if let Some((other, _)) = variants.iter().find(|(_, v)| *v == value) {
            return Err(Error::new(
                variant.span(),
                format!("Value `{}` is already used by `{}`", value, other),
            ));
        }
        variants.push((variant.ident.clone(), value));
    }
    let to_text = variants.iter().map(|(ident, value)| quote!(#name::#ident => #value));
    let from_text = variants.iter().map(|(ident, value)| quote!(#value => Ok(#name::#ident)));
    Ok(quote! {
        impl ::microrm::AsValue for #name {
            const FIELD_TYPE: ::microrm::FieldType =
                ::microrm::FieldType::Value(::microrm::Primitive::Enum);
            fn as_empty_value() -> ::microrm::Value {
                ::microrm::Value::Varchar(None)
            }
            fn as_value(self) -> ::microrm::Value {
                let value = match self {
                    #(#to_text,)*
                };
                ::microrm::Value::Varchar(Some(value.into()))
            }
            fn try_from_value(value: ::microrm::Value) -> ::microrm::anyhow::Result<Self> {
                match value {
                    ::microrm::Value::Varchar(Some(ref v)) => match v.as_str() {
                        #(#from_text,)*
                        _ => Err(::microrm::anyhow::anyhow!(
                            "Cannot convert {:?} to {}",
                            v,
                            stringify!(#name)
                        )),
                    },
                    _ => Err(::microrm::anyhow::anyhow!(
                        "Cannot convert {:?} to {}",
                        value,
                        stringify!(#name)
                    )),
                }
            }
        }
    })
}
