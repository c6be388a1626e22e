#![deny(
    missing_debug_implementations,
    nonstandard_style,
    rust_2018_idioms,
    missing_docs
)]
#![warn(unreachable_pub)]
#![doc = include_str!("../README.md")]

use proc_macro::TokenStream;

mod udt;
mod utils;

/// Derives `Udt` and `Type` for structs with named fields.
///
/// The generated implementation describes the struct's properties (in declaration order) to the
/// metadata engine and converts instances to and from records keyed by property name.
///
/// # Attributes
///
/// All attributes are optional and go in a `#[udt(...)]` attribute on the struct:
///
/// - `name = "SCHEMA.OBJECT|SCHEMA.COLLECTION"`: the capability marker naming the remote
///   identity. The collection part is optional. Without it, the identity must come from a preset.
/// - `attributes = "ATTR_A, ATTR_B"`: the remote object's attributes in order. Without it, the
///   attributes follow the struct's fields.
/// - `strict`: disables fuzzy property matching.
/// - `crate = "path"`: the path to the `udtlink` crate, `::udtlink` by default.
///
/// # Limitations
///
/// Tuple structs, enums, unions and generic structs are not supported.
///
/// ```rust,compile_fail
/// # use udtlink::udt::Udt;
/// #[derive(Udt)]  // This will fail to compile
/// struct Point(f32, f32);
/// ```
///
/// # Examples
///
/// ```rust
/// use udtlink::udt::{Shape, Type, Udt};
///
/// #[derive(Debug, PartialEq, Udt)]
/// #[udt(name = "HR.ADDRESS")]
/// struct Address {
///     street: String,
///     zip: Option<i32>,
/// }
///
/// #[derive(Debug, PartialEq, Udt)]
/// #[udt(name = "HR.EMP|HR.EMP_TBL")]
/// struct Employee {
///     id: i64,
///     address: Option<Address>,
///     history: Vec<Address>,
/// }
///
/// let properties: Vec<_> = Employee::OBJECT.properties().collect();
/// assert_eq!(properties.len(), 3);
/// assert_eq!(properties[0].name(), "id");
/// assert_eq!(properties[2].shape(), &Shape::Collection(Address::OBJECT));
/// assert_eq!(Employee::OBJECT.marker().unwrap().identity(), "HR.EMP|HR.EMP_TBL");
///
/// let employee = Employee {
///     id: 7,
///     address: None,
///     history: vec![Address { street: "Main".into(), zip: Some(1000) }],
/// };
/// let value = employee.to_value();
/// assert_eq!(Employee::from_value(value).unwrap(), employee);
/// ```
#[proc_macro_derive(Udt, attributes(udt))]
pub fn derive_udt(input: TokenStream) -> TokenStream {
    udt::derive_udt(input)
}
