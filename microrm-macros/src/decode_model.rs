use crate::{decode_field::FieldMetadata, decode_field::decode_field, table_name::table_name};
use syn::{
    Error, Expr, ExprLit, Fields, ItemStruct, Lit, LitStr, Result, Token, parenthesized,
    punctuated::Punctuated, spanned::Spanned,
};

pub(crate) const SURROGATE_KEY: &str = "id";

pub(crate) struct ModelMetadata {
    pub(crate) item: ItemStruct,
    /// Declared fields, surrogate excluded.
    pub(crate) fields: Vec<FieldMetadata>,
    pub(crate) surrogate: Option<FieldMetadata>,
    /// `#[microrm(table = "..")]`.
    pub(crate) table: Option<String>,
    /// `#[table_name("..")]`.
    pub(crate) table_name: Option<String>,
    pub(crate) primary_key: Option<String>,
    pub(crate) unique: Vec<String>,
}

impl ModelMetadata {
    pub(crate) fn has_surrogate_key(&self) -> bool {
        self.primary_key.as_deref() == Some(SURROGATE_KEY)
            && !self.fields.iter().any(|f| f.name == SURROGATE_KEY)
    }

    pub(crate) fn primary_key_field(&self) -> Option<&FieldMetadata> {
        if self.has_surrogate_key() {
            return self.surrogate.as_ref();
        }
        let pk = self.primary_key.as_deref()?;
        self.fields.iter().find(|f| f.name == pk)
    }
}

fn decode_column_list(input: &Expr) -> Result<Vec<String>> {
    match input {
        Expr::Lit(ExprLit {
            lit: Lit::Str(v), ..
        }) => Ok(vec![v.value()]),
        Expr::Tuple(tuple) => {
            let mut result = Vec::with_capacity(tuple.elems.len());
            for elem in &tuple.elems {
                result.extend(decode_column_list(elem)?);
            }
            Ok(result)
        }
        Expr::Paren(paren) => decode_column_list(&paren.expr),
        _ => Err(Error::new(
            input.span(),
            "Expected a column name string or a tuple of column names",
        )),
    }
}

pub(crate) fn decode_model(item: ItemStruct) -> Result<ModelMetadata> {
    if !item.generics.params.is_empty() {
        return Err(Error::new(
            item.generics.span(),
            "Models cannot be generic",
        ));
    }
    let Fields::Named(named) = &item.fields else {
        return Err(Error::new(
            item.ident.span(),
            "Models must be structs with named fields",
        ));
    };
    let mut fields = Vec::with_capacity(named.named.len());
    let mut surrogate: Option<FieldMetadata> = None;
    for field in &named.named {
        let metadata = decode_field(field)?;
        if metadata.surrogate {
            if surrogate.is_some() {
                return Err(Error::new(
                    field.span(),
                    "Only one field can be marked `#[microrm(surrogate)]`",
                ));
            }
            surrogate = Some(metadata);
        } else {
            if fields.iter().any(|f: &FieldMetadata| f.name == metadata.name) {
                return Err(Error::new(
                    field.span(),
                    format!("Column `{}` is declared twice", metadata.name),
                ));
            }
            fields.push(metadata);
        }
    }
    let mut table = None;
    let mut primary_key = Some(SURROGATE_KEY.to_string());
    let mut unique = Vec::new();
    let mut primary_key_span = item.ident.span();
    let mut unique_span = item.ident.span();
    for attr in &item.attrs {
        if !attr.path().is_ident("microrm") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("table") {
                let value: LitStr = meta.value()?.parse().map_err(|_| {
                    meta.error("Use it like: `#[microrm(table = \"my_table\")]`")
                })?;
                if value.value().is_empty() {
                    return Err(Error::new(value.span(), "The table name cannot be empty"));
                }
                table = Some(value.value());
            } else if meta.path.is_ident("pk") {
                primary_key_span = meta.path.span();
                let value = meta.value()?;
                if value.peek(LitStr) {
                    primary_key = Some(value.parse::<LitStr>()?.value());
                } else if value.peek(syn::Ident) {
                    let ident: syn::Ident = value.parse()?;
                    if ident != "none" {
                        return Err(Error::new(
                            ident.span(),
                            "Use it like: `#[microrm(pk = \"field\")]` or `#[microrm(pk = none)]`",
                        ));
                    }
                    primary_key = None;
                } else {
                    return Err(meta.error(
                        "Use it like: `#[microrm(pk = \"field\")]` or `#[microrm(pk = none)]`",
                    ));
                }
            } else if meta.path.is_ident("unique") {
                unique_span = meta.path.span();
                unique = if meta.input.peek(Token![=]) {
                    decode_column_list(&meta.value()?.parse::<Expr>()?)?
                } else if meta.input.peek(syn::token::Paren) {
                    let content;
                    parenthesized!(content in meta.input);
                    Punctuated::<LitStr, Token![,]>::parse_terminated(&content)?
                        .into_iter()
                        .map(|v| v.value())
                        .collect()
                } else {
                    return Err(meta.error(
                        "Use it like: `#[microrm(unique = \"column\")]` or `#[microrm(unique(\"a\", \"b\"))]`",
                    ));
                };
            } else {
                return Err(meta.error(
                    "Unknown attribute inside microrm macro, expected `table`, `pk` or `unique`",
                ));
            }
            Ok(())
        })?;
    }
    let table_name = table_name(&item)?;
    let metadata = ModelMetadata {
        item,
        fields,
        surrogate,
        table,
        table_name,
        primary_key,
        unique,
    };
    let surrogate_key = metadata.has_surrogate_key();
    if let Some(pk) = &metadata.primary_key {
        if !surrogate_key && !metadata.fields.iter().any(|f| f.name == *pk) {
            return Err(Error::new(
                primary_key_span,
                format!("Primary key `{}` is not a field of the model", pk),
            ));
        }
    }
    if let Some(field) = &metadata.surrogate {
        if !surrogate_key {
            return Err(Error::new(
                field.ident.span(),
                "A surrogate field requires the implicit `id` primary key",
            ));
        }
    }
    for column in &metadata.unique {
        let surrogate_column = surrogate_key && column == SURROGATE_KEY;
        if !surrogate_column && !metadata.fields.iter().any(|f| f.name == *column) {
            return Err(Error::new(
                unique_span,
                format!("Unique column `{}` is not a field of the model", column),
            ));
        }
    }
    if metadata.fields.is_empty() && !surrogate_key {
        return Err(Error::new(
            metadata.item.ident.span(),
            "A model needs at least one column",
        ));
    }
    Ok(metadata)
}
