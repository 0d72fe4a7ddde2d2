use syn::{Error, ItemStruct, LitStr, Result};

/// Type level `#[table_name("..")]` attribute, if present.
pub(crate) fn table_name(item: &ItemStruct) -> Result<Option<String>> {
    let mut result = None;
    for attr in &item.attrs {
        if !attr.meta.path().is_ident("table_name") {
            continue;
        }
        let value = attr
            .meta
            .require_list()
            .and_then(|v| v.parse_args::<LitStr>())
            .map_err(|e| {
                Error::new(
                    e.span(),
                    format!(
                        "Error while parsing `table_name`, use it like #[table_name(\"{}s\")]",
                        item.ident.to_string().to_lowercase()
                    ),
                )
            })?;
        if result.is_some() {
            return Err(Error::new_spanned(attr, "`table_name` can appear just once"));
        }
        result = Some(value.value());
    }
    Ok(result)
}
