//! Procedural macros used internally by the [`hetview`](https://docs.rs/hetview) crate to generate
//! the impls that Rust cannot express generically: one impl per type-level count and one impl per
//! tuple arity.
//!
//! None of these macros is meant to be invoked outside of `hetview`; the generated code refers to
//! items through `crate::` paths.

extern crate proc_macro;

use proc_macro::TokenStream;
use proc_macro2::{Literal, TokenStream as TokenStream2};
use quote::{format_ident, quote};
use syn::LitInt;

/// Parse the single integer literal bound passed to every macro in this crate.
fn parse_bound(input: TokenStream) -> Result<usize, syn::Error> {
    let lit = syn::parse::<LitInt>(input)?;
    lit.base10_parse::<usize>()
}

/// The nested unary type `S<S<...Z>>` for the number `n`.
fn unary_type(n: usize) -> TokenStream2 {
    let mut ty = quote!(crate::unary::Z);
    for _ in 0..n {
        ty = quote!(crate::unary::S<#ty>);
    }
    ty
}

/// Generate [`ToUnary`] and [`ToConstant`] impls for every `Number<N>` with `N` up to and including
/// the given bound.
#[proc_macro]
pub fn generate_unary_conversion_impls(input: TokenStream) -> TokenStream {
    let bound = match parse_bound(input) {
        Ok(bound) => bound,
        Err(e) => return e.to_compile_error().into(),
    };

    let impls = (0..=bound).map(|n| {
        let lit = Literal::usize_unsuffixed(n);
        let unary = unary_type(n);
        quote! {
            impl crate::unary::ToUnary for crate::unary::Number<#lit> {
                type AsUnary = #unary;
            }

            impl crate::unary::ToConstant for #unary {
                type AsConstant = crate::unary::Number<#lit>;
            }
        }
    });

    quote!(#(#impls)*).into()
}

/// The primitive integer categories, ordered as the width selector searches them.
const CATEGORIES: &[(&str, u128, bool)] = &[
    ("i8", i8::MAX as u128, true),
    ("u8", u8::MAX as u128, false),
    ("i16", i16::MAX as u128, true),
    ("u16", u16::MAX as u128, false),
    ("i32", i32::MAX as u128, true),
    ("u32", u32::MAX as u128, false),
    ("i64", i64::MAX as u128, true),
    ("u64", u64::MAX as u128, false),
    ("i128", i128::MAX as u128, true),
    ("u128", u128::MAX, false),
];

/// Select the first category able to hold `n`, restricted by `filter`, falling back on the widest.
fn narrowest(n: u128, filter: impl Fn(bool) -> bool) -> &'static str {
    let mut last = "u128";
    for &(name, max, signed) in CATEGORIES {
        if !filter(signed) {
            continue;
        }
        last = name;
        if n <= max {
            return name;
        }
    }
    last
}

/// The unsigned counterpart of a signed category name.
fn unsigned_of(signed: &str) -> &'static str {
    match signed {
        "i8" => "u8",
        "i16" => "u16",
        "i32" => "u32",
        "i64" => "u64",
        _ => "u128",
    }
}

/// Generate `Least` impls for every `Number<N>` with `N` up to and including the given bound.
#[proc_macro]
pub fn impl_least(input: TokenStream) -> TokenStream {
    let bound = match parse_bound(input) {
        Ok(bound) => bound,
        Err(e) => return e.to_compile_error().into(),
    };

    let impls = (0..=bound).map(|n| {
        let lit = Literal::usize_unsuffixed(n);
        let any = format_ident!("{}", narrowest(n as u128, |_| true));
        let signed_name = narrowest(n as u128, |signed| signed);
        let signed = format_ident!("{}", signed_name);
        let unsigned = format_ident!("{}", unsigned_of(signed_name));
        quote! {
            impl crate::least::Least for crate::unary::Number<#lit> {
                type Type = #any;
                type Signed = #signed;
                type Unsigned = #unsigned;
            }
        }
    });

    quote!(#(#impls)*).into()
}

/// Generate `VisitEach<Number<N>>` blanket impls for every `N` up to and including the given bound.
/// Each impl is a jump table from a runtime position to the statically typed branch. A count of
/// zero has no branch, so its output is uninhabited.
#[proc_macro]
pub fn impl_visit_each(input: TokenStream) -> TokenStream {
    let bound = match parse_bound(input) {
        Ok(bound) => bound,
        Err(e) => return e.to_compile_error().into(),
    };

    let empty = quote! {
        impl<V> crate::visit::VisitEach<crate::unary::Number<0>> for V {
            type Output = ::std::convert::Infallible;
            const INFALLIBLE: bool = true;

            fn visit_at(self, position: usize) -> ::std::convert::Infallible {
                unreachable!("position {} is out of bounds for a count of 0", position)
            }
        }
    };

    let impls = (1..=bound).map(|n| {
        let lit = Literal::usize_unsuffixed(n);
        let positions: Vec<_> = (0..n).map(Literal::usize_unsuffixed).collect();
        let bounds = positions.iter().map(|i| {
            quote!(crate::visit::VisitOnce<crate::visit::Index<#i>, Output = R>)
        });
        let infallible = positions.iter().map(|i| {
            quote!(<V as crate::visit::VisitOnce<crate::visit::Index<#i>>>::INFALLIBLE)
        });
        let arms = positions.iter().map(|i| {
            quote! {
                #i => crate::visit::VisitOnce::<crate::visit::Index<#i>>::visit_once(
                    self,
                    crate::visit::Index::<#i>,
                ),
            }
        });
        quote! {
            impl<V, R> crate::visit::VisitEach<crate::unary::Number<#lit>> for V
            where
                V: #(#bounds)+*,
            {
                type Output = R;
                const INFALLIBLE: bool = #(#infallible)&&*;

                #[inline]
                fn visit_at(self, position: usize) -> R {
                    match position {
                        #(#arms)*
                        _ => unreachable!(
                            "position {} is out of bounds for a count of {}",
                            position,
                            #lit,
                        ),
                    }
                }
            }
        }
    });

    quote!(#empty #(#impls)*).into()
}

/// Generate `TupleLike`, `Get<I>` and `TypeList` impls for every tuple arity up to and including
/// the given bound.
#[proc_macro]
pub fn impl_tuples(input: TokenStream) -> TokenStream {
    let bound = match parse_bound(input) {
        Ok(bound) => bound,
        Err(e) => return e.to_compile_error().into(),
    };

    let impls = (0..=bound).map(|arity| {
        let lit = Literal::usize_unsuffixed(arity);
        let params: Vec<_> = (0..arity).map(|i| format_ident!("T{}", i)).collect();
        let tuple = quote!((#(#params,)*));

        let getters = params.iter().enumerate().map(|(i, param)| {
            let position = Literal::usize_unsuffixed(i);
            let field = syn::Index::from(i);
            quote! {
                impl<#(#params),*> crate::tuple::Get<#position> for #tuple {
                    type Element = #param;

                    #[inline]
                    fn get(&self) -> &#param {
                        &self.#field
                    }

                    #[inline]
                    fn get_mut(&mut self) -> &mut #param {
                        &mut self.#field
                    }

                    #[inline]
                    fn into_element(self) -> #param {
                        self.#field
                    }
                }
            }
        });

        quote! {
            impl<#(#params),*> crate::tuple::TupleLike for #tuple {
                type Length = crate::unary::Number<#lit>;
            }

            #(#getters)*

            impl<#(#params: 'static),*> crate::predicate::TypeList for #tuple {
                fn type_ids() -> ::std::vec::Vec<::std::any::TypeId> {
                    ::std::vec![#(::std::any::TypeId::of::<#params>()),*]
                }
            }
        }
    });

    quote!(#(#impls)*).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proc_macro2::TokenTree;

    #[test]
    fn narrowest_any_prefers_signed_first() {
        assert_eq!(narrowest(0, |_| true), "i8");
        assert_eq!(narrowest(127, |_| true), "i8");
        assert_eq!(narrowest(128, |_| true), "u8");
        assert_eq!(narrowest(255, |_| true), "u8");
        assert_eq!(narrowest(256, |_| true), "i16");
    }

    #[test]
    fn narrowest_signed_and_counterpart() {
        assert_eq!(narrowest(127, |signed| signed), "i8");
        assert_eq!(unsigned_of(narrowest(127, |signed| signed)), "u8");
        assert_eq!(narrowest(128, |signed| signed), "i16");
        assert_eq!(unsigned_of(narrowest(128, |signed| signed)), "u16");
        assert_eq!(narrowest(u128::MAX, |signed| signed), "i128");
    }

    #[test]
    fn unary_type_nests() {
        let successors = |n| {
            unary_type(n)
                .into_iter()
                .flat_map(|tree| match tree {
                    TokenTree::Ident(ident) => Some(ident.to_string()),
                    _ => None,
                })
                .filter(|ident| ident == "S")
                .count()
        };
        assert_eq!(successors(0), 0);
        assert_eq!(successors(3), 3);
    }
}
