use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Error, Fields, FieldsNamed};

use crate::utils::{self, UdtAttrs};

/// Main entry point for the Udt derive macro.
pub(crate) fn derive_udt(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);

    match derive_udt_impl(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn derive_udt_impl(input: DeriveInput) -> Result<TokenStream2, Error> {
    let name = &input.ident;
    if !input.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &input.generics,
            "Udt derive macro does not support generic types",
        ));
    }
    let attrs = utils::parse_udt_attrs(&input.attrs)?;
    let crate_path = attrs.crate_path();

    let named = match &input.data {
        Data::Struct(data_struct) => match &data_struct.fields {
            Fields::Named(FieldsNamed { named, .. }) => named.iter().collect(),
            Fields::Unit => Vec::new(),
            Fields::Unnamed(unnamed) => {
                return Err(Error::new_spanned(
                    unnamed,
                    "Only named fields are supported",
                ))
            }
        },
        Data::Enum(_) | Data::Union(_) => {
            return Err(Error::new_spanned(
                input,
                "Udt derive macro only supports structs",
            ));
        }
    };

    let mut property_statics = Vec::new();
    let mut property_refs = Vec::new();
    let mut to_record = Vec::new();
    let mut from_record = Vec::new();
    for field in named {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new_spanned(field, "Field must have a name"))?;
        let field_type = &field.ty;
        let field_name_str = field_name.to_string();
        let static_name = format_ident!("PROPERTY_{}", field_name_str.to_uppercase());

        property_statics.push(quote! {
            static #static_name: #crate_path::udt::Property<'static> =
                #crate_path::udt::Property::new(
                    #field_name_str,
                    <#field_type as #crate_path::udt::Type>::SHAPE,
                );
        });
        property_refs.push(quote! { &#static_name });
        to_record.push(quote! {
            record.insert(
                #field_name_str,
                #crate_path::udt::Type::to_value(&self.#field_name),
            );
        });
        from_record.push(quote! {
            #field_name: <#field_type as #crate_path::udt::Type>::from_value(
                record.take(#field_name_str),
            )?,
        });
    }

    let marker = marker_tokens(&attrs, &crate_path);
    let name_str = name.to_string();
    let property_count = property_refs.len();
    let (record_mut, record_binding) = if property_count == 0 {
        (quote! {}, quote! { _record })
    } else {
        (quote! { mut }, quote! { mut record })
    };

    Ok(quote! {
        impl #crate_path::udt::Udt for #name {
            const OBJECT: &'static #crate_path::udt::ObjectShape<'static> = &{
                #(#property_statics)*
                #marker

                static PROPERTIES: &[&#crate_path::udt::Property<'static>] = &[
                    #(#property_refs),*
                ];

                #crate_path::udt::ObjectShape::new(
                    ::core::concat!(::core::module_path!(), "::", #name_str),
                    MARKER,
                    PROPERTIES,
                )
            };

            fn to_record(&self) -> #crate_path::Record {
                let #record_mut record = #crate_path::Record::with_capacity(#property_count);
                #(#to_record)*
                record
            }

            fn from_record(#record_binding: #crate_path::Record) -> #crate_path::Result<Self> {
                ::core::result::Result::Ok(Self {
                    #(#from_record)*
                })
            }
        }

        impl #crate_path::udt::Type for #name {
            const SHAPE: &'static #crate_path::udt::Shape<'static> =
                &#crate_path::udt::Shape::Object(<Self as #crate_path::udt::Udt>::OBJECT);

            fn to_value(&self) -> #crate_path::Value {
                #crate_path::udt::object_to_value(self)
            }

            fn from_value(value: #crate_path::Value) -> #crate_path::Result<Self> {
                #crate_path::udt::object_from_value(value)
            }
        }
    })
}

/// The `MARKER` static: `Some(&marker)` when the struct names its identity, `None` otherwise.
fn marker_tokens(attrs: &UdtAttrs, crate_path: &TokenStream2) -> TokenStream2 {
    match &attrs.name {
        Some(identity) => {
            let attributes = &attrs.attributes;
            let strict = attrs.strict;
            quote! {
                static MARKER_ATTRIBUTES: &[&str] = &[#(#attributes),*];
                static MARKER_VALUE: #crate_path::udt::Marker<'static> =
                    #crate_path::udt::Marker::new(#identity, MARKER_ATTRIBUTES, #strict);
                static MARKER: ::core::option::Option<&#crate_path::udt::Marker<'static>> =
                    ::core::option::Option::Some(&MARKER_VALUE);
            }
        }
        None => quote! {
            static MARKER: ::core::option::Option<&#crate_path::udt::Marker<'static>> =
                ::core::option::Option::None;
        },
    }
}
