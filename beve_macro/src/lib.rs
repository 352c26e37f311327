#![recursion_limit = "128"]

extern crate proc_macro;

/// Support for enum auto-derive.
mod enum_impl;
/// Support for struct auto-derive.
mod struct_impl;

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, parse_quote, Data, DeriveInput, GenericParam};

/// Derives `beve::rep::BeveRep`.
///
/// * Structs with named fields become string-keyed objects, fields in declaration order.
/// * Tuple structs become generic arrays.
/// * Unit structs become null.
/// * Enums become variant extensions tagged with the variant's index. The payload is
///   null for a unit variant, the value itself for a single-field tuple variant, an
///   array for other tuple variants and an object for struct variants.
///
/// Every type parameter gets a `BeveRep` bound.
#[proc_macro_derive(BeveRep)]
pub fn beve_rep_derive(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    impl_beve_rep_macro(ast).into()
}

fn impl_beve_rep_macro(mut ast: DeriveInput) -> proc_macro2::TokenStream {
    for param in ast.generics.params.iter_mut() {
        if let GenericParam::Type(ty) = param {
            ty.bounds.push(parse_quote!(::beve::rep::BeveRep));
        }
    }

    let name = &ast.ident;
    let body = match &ast.data {
        Data::Struct(sd) => struct_impl::beve_rep(name, sd),
        Data::Enum(ed) => enum_impl::beve_rep(name, ed),
        Data::Union(u) => {
            return syn::Error::new(u.union_token.span, "`BeveRep` can't be derived for unions")
                .to_compile_error()
        }
    };

    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();
    quote! {
        impl #impl_generics ::beve::rep::BeveRep for #name #ty_generics #where_clause {
            #body
        }
    }
}
