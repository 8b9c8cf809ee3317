mod error_kind;

use error_kind::ErrorKindTarget;
use proc_macro::TokenStream;
use quote::ToTokens;
use syn::parse_macro_input;

/// Implements `sym_error::ErrorKind` for a struct described by an `error` attribute.
///
/// Unit structs and structs with named fields are accepted, generic or not. The expansion names
/// the `sym_error` and `ariadne` crates directly, so the deriving crate must depend on both.
///
/// ```
/// use sym_attrs::ErrorKind;
/// use sym_error::{Category, ErrorKind};
///
/// #[derive(Debug, ErrorKind)]
/// #[error(
///     category = Category::Semantic,
///     message = format!("`{}` is not a rule", name),
///     labels = ["used here"],
///     help = "rules are created with `define`",
/// )]
/// pub struct NotARule {
///     name: String,
/// }
///
/// let err = NotARule { name: "r".to_string() };
/// assert_eq!(err.category(), Category::Semantic);
/// ```
///
/// Recognized tags, each taking an arbitrary expression:
///
/// - `category` (required): the `sym_error::Category` of the error.
/// - `message` (required): the headline of the report.
/// - `labels`: texts attached, in order, to the spans the error carries. Empty texts give an
///   unlabelled highlight.
/// - `help`: a hint printed under the report.
///
/// Tag expressions see the fields of the struct as references. Unknown or repeated tags are
/// rejected at compile time.
#[proc_macro_derive(ErrorKind, attributes(error))]
pub fn error_kind(item: TokenStream) -> TokenStream {
    parse_macro_input!(item as ErrorKindTarget)
        .into_token_stream()
        .into()
}
