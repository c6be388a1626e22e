use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Attribute, Error, LitStr};

/// Settings collected from `#[udt(...)]` attributes on a struct.
#[derive(Debug, Default)]
pub(crate) struct UdtAttrs {
    /// The crate path, `::udtlink` unless overridden.
    pub(crate) crate_path: Option<TokenStream2>,
    /// The identity string of the capability marker.
    pub(crate) name: Option<LitStr>,
    /// The declared remote attributes.
    pub(crate) attributes: Vec<String>,
    /// Whether fuzzy matching is disabled.
    pub(crate) strict: bool,
}

impl UdtAttrs {
    /// The crate path to use in generated code.
    pub(crate) fn crate_path(&self) -> TokenStream2 {
        self.crate_path
            .clone()
            .unwrap_or_else(|| quote! { ::udtlink })
    }
}

/// Parse all `#[udt(...)]` attributes.
///
/// # Examples
///
/// ```ignore
/// #[derive(Udt)]
/// #[udt(name = "HR.EMP|HR.EMP_TBL", attributes = "ID, NAME", strict, crate = "crate")]
/// struct Employee { id: i64, name: String }
/// ```
pub(crate) fn parse_udt_attrs(attrs: &[Attribute]) -> Result<UdtAttrs, Error> {
    let mut result = UdtAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("udt") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("crate") {
                let lit_str: LitStr = meta.value()?.parse()?;
                result.crate_path = Some(syn::parse_str(&lit_str.value())?);
            } else if meta.path.is_ident("name") {
                let lit_str: LitStr = meta.value()?.parse()?;
                if lit_str.value().trim().is_empty() {
                    return Err(meta.error("`name` must not be empty"));
                }
                result.name = Some(lit_str);
            } else if meta.path.is_ident("attributes") {
                let lit_str: LitStr = meta.value()?.parse()?;
                result.attributes = lit_str
                    .value()
                    .split(',')
                    .map(|attribute| attribute.trim().to_uppercase())
                    .filter(|attribute| !attribute.is_empty())
                    .collect();
            } else if meta.path.is_ident("strict") {
                result.strict = true;
            } else {
                return Err(meta.error("unknown `udt` attribute"));
            }
            Ok(())
        })?;
    }

    if (result.strict || !result.attributes.is_empty()) && result.name.is_none() {
        return Err(Error::new(
            proc_macro2::Span::call_site(),
            "`attributes` and `strict` require `name`",
        ));
    }

    Ok(result)
}
