use crate::decode_model::{ModelMetadata, SURROGATE_KEY};
use proc_macro2::TokenStream;
use quote::quote;
use syn::Ident;

/// `{Model}Columns` trait exposing one `ColumnRef` constant per column.
pub(crate) fn column_trait(model: &ModelMetadata) -> TokenStream {
    let item = &model.item;
    let struct_name = &item.ident;
    let vis = &item.vis;
    let type_name = struct_name.to_string();
    let trait_name = Ident::new(&format!("{}Columns", struct_name), struct_name.span());
    let surrogate = model.has_surrogate_key().then(|| {
        (
            Ident::new(SURROGATE_KEY, struct_name.span()),
            SURROGATE_KEY.to_string(),
        )
    });
    let columns = surrogate
        .into_iter()
        .chain(model.fields.iter().map(|f| (f.ident.clone(), f.name.clone())))
        .collect::<Vec<_>>();
    let declarations = columns.iter().map(|(ident, _)| {
        quote! {
            #[allow(non_upper_case_globals)]
            const #ident: ::microrm::ColumnRef;
        }
    });
    let definitions = columns.iter().map(|(ident, name)| {
        quote! {
            const #ident: ::microrm::ColumnRef = ::microrm::ColumnRef::new(#name, #type_name);
        }
    });
    quote! {
        #vis trait #trait_name {
            #(#declarations)*
        }
        impl #trait_name for #struct_name {
            #(#definitions)*
        }
    }
}
