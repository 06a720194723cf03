//! pomkit derive macros: enum-backed element descriptors
//!
//! Screens usually name their elements with a fieldless enum. Deriving
//! `ElementDescriptor` turns each variant into a fixed identifier, so a
//! typo in an element name is a compile error instead of a ten-second
//! timeout.
//!
//! ```ignore
//! use pomkit::ElementDescriptor;
//!
//! #[derive(ElementDescriptor)]
//! enum Checkout {
//!     PayButton,                      // "payButton"
//!     #[descriptor(id = "checkout.total")]
//!     Total,                          // "checkout.total"
//! }
//!
//! assert_eq!(Checkout::PayButton.id(), "payButton");
//! ```
//!
//! The default identifier is the variant name in lowerCamelCase. Leading
//! acronyms are lowered as a unit (`URLField` becomes `urlField`).

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, LitStr};

/// Derive `pomkit::ElementDescriptor` for a fieldless enum.
///
/// Generates the trait impl and an inherent `const fn as_id(&self) ->
/// &'static str`.
///
/// # Attributes
///
/// - `#[descriptor(id = "...")]` on a variant overrides its identifier
#[proc_macro_derive(ElementDescriptor, attributes(descriptor))]
pub fn derive_element_descriptor(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            name,
            "ElementDescriptor can only be derived for enums",
        ));
    };

    let mut arms = Vec::with_capacity(data.variants.len());
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "ElementDescriptor variants must not carry data; use DynamicDescriptor for runtime identifiers",
            ));
        }
        let ident = &variant.ident;
        let id = match descriptor_override(&variant.attrs)? {
            Some(id) => id,
            None => to_lower_camel_case(&ident.unraw().to_string()),
        };
        arms.push(quote! { Self::#ident => #id });
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics #name #ty_generics #where_clause {
            /// Identifier of this element
            #[inline]
            pub const fn as_id(&self) -> &'static str {
                match *self {
                    #(#arms,)*
                }
            }
        }

        impl #impl_generics ::pomkit::ElementDescriptor for #name #ty_generics #where_clause {
            fn id(&self) -> ::std::string::String {
                ::std::string::String::from(self.as_id())
            }
        }
    })
}

/// Read `#[descriptor(id = "...")]`
fn descriptor_override(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut id = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("descriptor")) {
        attr.parse_nested_meta(|meta| {
            if !meta.path.is_ident("id") {
                return Err(meta.error("expected `id = \"...\"`"));
            }
            let lit: LitStr = meta.value()?.parse()?;
            if lit.value().is_empty() {
                return Err(syn::Error::new_spanned(&lit, "descriptor id must not be empty"));
            }
            id = Some(lit.value());
            Ok(())
        })?;
    }
    Ok(id)
}

/// Convert PascalCase to lowerCamelCase
fn to_lower_camel_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len());
    let mut leading = true;

    for (i, &c) in chars.iter().enumerate() {
        if leading && c.is_uppercase() {
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if i > 0 && next_lower {
                // last capital of a leading acronym starts the next word
                leading = false;
                result.push(c);
            } else {
                result.extend(c.to_lowercase());
            }
        } else {
            leading = false;
            result.push(c);
        }
    }

    result
}
