use syn::{Error, Field, Ident, Result, Type, ext::IdentExt, spanned::Spanned};

pub(crate) struct FieldMetadata {
    pub(crate) ident: Ident,
    pub(crate) ty: Type,
    /// Column name, the field name without the raw prefix.
    pub(crate) name: String,
    pub(crate) surrogate: bool,
}

pub(crate) fn decode_field(field: &Field) -> Result<FieldMetadata> {
    let Some(ident) = field.ident.clone() else {
        return Err(Error::new(field.span(), "Field is expected to have a name"));
    };
    let mut metadata = FieldMetadata {
        name: ident.unraw().to_string(),
        ident,
        ty: field.ty.clone(),
        surrogate: false,
    };
    for attr in &field.attrs {
        if !attr.path().is_ident("microrm") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("surrogate") {
                if !meta.input.is_empty() && !meta.input.peek(syn::Token![,]) {
                    return Err(meta.error("Use it like: `#[microrm(surrogate)]`"));
                }
                metadata.surrogate = true;
                Ok(())
            } else {
                Err(meta.error(
                    "Unknown attribute inside microrm macro, fields accept only `surrogate`",
                ))
            }
        })?;
    }
    Ok(metadata)
}
