use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Lit, LitStr, Meta, Token, Type};

/// Derive macro that describes the input fields of a flat record.
///
/// For each named field, extracts:
/// - Field name (respects #[serde(rename = "...")])
/// - Required (true if not Option<T>)
/// - Unit of measure (from #[field(unit = "...")])
/// - Description (from doc comments)
///
/// Generates a `field_schema() -> &'static [SchemaField]` method. `SchemaField`
/// must be in scope at the derive site.
#[proc_macro_derive(FieldSchema, attributes(serde, field))]
pub fn derive_field_schema(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return syn::Error::new_spanned(name, "FieldSchema requires named fields")
                    .to_compile_error()
                    .into()
            }
        },
        _ => {
            return syn::Error::new_spanned(name, "FieldSchema only supports structs")
                .to_compile_error()
                .into()
        }
    };

    let mut entries = Vec::new();
    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let field_name = match serde_rename(&field.attrs) {
            Ok(rename) => rename.unwrap_or_else(|| ident.to_string()),
            Err(err) => return err.to_compile_error().into(),
        };
        let unit = match field_unit(&field.attrs) {
            Ok(Some(unit)) => quote!(Some(#unit)),
            Ok(None) => quote!(None),
            Err(err) => return err.to_compile_error().into(),
        };
        let required = !is_option_type(&field.ty);
        let description = doc_comment(&field.attrs);

        entries.push(quote! {
            SchemaField {
                name: #field_name,
                required: #required,
                unit: #unit,
                description: #description,
            }
        });
    }

    let expanded = quote! {
        impl #name {
            pub fn field_schema() -> &'static [SchemaField] {
                static SCHEMA: &[SchemaField] = &[
                    #(#entries),*
                ];
                SCHEMA
            }
        }
    };

    TokenStream::from(expanded)
}

fn serde_rename(attrs: &[syn::Attribute]) -> syn::Result<Option<String>> {
    let mut rename = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let lit: LitStr = meta.value()?.parse()?;
                rename = Some(lit.value());
            } else if meta.input.peek(Token![=]) {
                // other key = value options are not ours
                let _: syn::Expr = meta.value()?.parse()?;
            }
            Ok(())
        })?;
    }
    Ok(rename)
}

fn field_unit(attrs: &[syn::Attribute]) -> syn::Result<Option<String>> {
    let mut unit = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("field")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("unit") {
                let lit: LitStr = meta.value()?.parse()?;
                unit = Some(lit.value());
                Ok(())
            } else {
                Err(meta.error("unsupported field attribute, expected `unit`"))
            }
        })?;
    }
    Ok(unit)
}

fn doc_comment(attrs: &[syn::Attribute]) -> String {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(meta) => match &meta.value {
                syn::Expr::Lit(expr_lit) => match &expr_lit.lit {
                    Lit::Str(lit_str) => Some(lit_str.value().trim().to_string()),
                    _ => None,
                },
                _ => None,
            },
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_option_type(ty: &Type) -> bool {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            return segment.ident == "Option";
        }
    }
    false
}
