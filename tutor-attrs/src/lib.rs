mod error_kind;

use error_kind::ErrorKindTarget;
use proc_macro::TokenStream;
use quote::quote;
use syn::parse_macro_input;

/// Derives the [`ErrorKind`] trait for the given struct.
///
/// The information of the error can be customized using the `error` attribute by adding the
/// corresponding tags to it:
/// ```
/// use tutor_attrs::ErrorKind;
/// use tutor_error::ErrorKind;
///
/// #[derive(Debug, ErrorKind)]
/// #[error(message = "the expression tree is empty", labels = ["add a node here"])]
/// pub struct EmptyTree;
/// ```
///
/// The following tags are available:
///
/// | Tag         | Description                                                                  |
/// | ----------- | ---------------------------------------------------------------------------- |
/// | `message`   | The message displayed at the top of the error when it is displayed.          |
/// | `labels`    | An array of label texts; label `i` points at span `i` of the error.          |
/// | `help`      | Optional help text for the error, describing what the caller can do about it.|
///
/// Each tag accepts an expression that should evaluate to a [`String`] (or an array of strings for
/// `labels`). The expression is evaluated with `self` in scope, and for structs with named fields,
/// with the fields destructured into local bindings as well. Tuple structs are not supported.
///
/// The generated [`ErrorKind::name`] returns the name of the struct, which callers use to tell
/// error kinds apart in logs and serialized output.
#[proc_macro_derive(ErrorKind, attributes(error))]
pub fn error_kind(item: TokenStream) -> TokenStream {
    let target = parse_macro_input!(item as ErrorKindTarget);
    let name = &target.name;
    quote! {
        impl ErrorKind for #name {
            fn as_any(&self) -> &dyn std::any::Any {
                self
            }

            fn name(&self) -> &'static str {
                stringify!(#name)
            }

            #target
        }
    }.into()
}
