use crate::decode_model::ModelMetadata;
use proc_macro2::TokenStream;
use quote::quote;

/// Body of `Model::from_row`: every declared field is taken out of the row by
/// column name, the surrogate field starts from its default.
pub(crate) fn from_row_body(model: &ModelMetadata) -> TokenStream {
    let struct_name = &model.item.ident;
    let assignments = model.fields.iter().map(|f| {
        let ident = &f.ident;
        let ty = &f.ty;
        let name = &f.name;
        quote! {
            #ident: <#ty as ::microrm::AsValue>::try_from_value(
                row.take_column(#name).ok_or_else(|| __make_error__(#name))?,
            )?
        }
    });
    let surrogate = model.surrogate.iter().map(|f| {
        let ident = &f.ident;
        quote!(#ident: ::std::default::Default::default())
    });
    quote! {
        #[allow(unused_variables)]
        let __make_error__ = |name: &str| {
            ::microrm::anyhow::anyhow!(
                "Column `{}` does not exist in the row provided",
                name
            )
        };
        Ok(#struct_name {
            #(#assignments,)*
            #(#surrogate,)*
        })
    }
}
