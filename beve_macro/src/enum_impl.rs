use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::{DataEnum, Fields, Ident};

/// The pieces generated for one variant.
struct Arms {
    to_beve: TokenStream,
    into_beve: TokenStream,
    from_beve: TokenStream,
}

fn variant_arms(name: &Ident, index: u32, variant: &Ident, fields: &Fields) -> Arms {
    let ident_string = variant.to_string();
    // decoded tags are compared as SIZEs
    let tag = u64::from(index);
    match fields {
        Fields::Unit => {
            let arm = quote! {
                #name::#variant => ::beve::rep::enum_to_beve_helper(#index, ::beve::Value::Null),
            };
            Arms {
                to_beve: arm.clone(),
                into_beve: arm,
                from_beve: quote! {
                    #tag => {
                        ::beve::rep::unit_from_beve_helper(payload, #ident_string)?;
                        Ok(#name::#variant)
                    }
                },
            }
        }
        // a lone field is the payload itself
        Fields::Unnamed(fields) if fields.unnamed.len() == 1 => Arms {
            to_beve: quote! {
                #name::#variant(field0) => ::beve::rep::enum_to_beve_helper(
                    #index,
                    ::beve::rep::BeveRep::to_beve(field0),
                ),
            },
            into_beve: quote! {
                #name::#variant(field0) => ::beve::rep::enum_to_beve_helper(
                    #index,
                    ::beve::rep::BeveRep::into_beve(field0),
                ),
            },
            from_beve: quote! {
                #tag => Ok(#name::#variant(::beve::rep::BeveRep::from_beve(payload)?)),
            },
        },
        Fields::Unnamed(fields) => {
            let len = fields.unnamed.len();
            let idents: Vec<Ident> = (0..len)
                .map(|i| Ident::new(&format!("field{}", i), Span::call_site()))
                .collect();
            let popped = (0..len).map(|_| quote! { ::beve::rep::pop_beve(&mut elems)? });
            Arms {
                to_beve: quote! {
                    #name::#variant(#(#idents),*) => ::beve::rep::enum_to_beve_helper(
                        #index,
                        ::beve::Value::Array(::beve::Array::Generic(vec![
                            #(::beve::rep::BeveRep::to_beve(#idents)),*
                        ])),
                    ),
                },
                into_beve: quote! {
                    #name::#variant(#(#idents),*) => ::beve::rep::enum_to_beve_helper(
                        #index,
                        ::beve::Value::Array(::beve::Array::Generic(vec![
                            #(::beve::rep::BeveRep::into_beve(#idents)),*
                        ])),
                    ),
                },
                from_beve: quote! {
                    #tag => {
                        #[allow(unused_mut, unused_variables)]
                        let mut elems = ::beve::rep::tuple_from_beve_helper(payload, #len)?;
                        Ok(#name::#variant(#(#popped),*))
                    }
                },
            }
        }
        // C-style variants
        Fields::Named(fields) => {
            let field_names: Vec<&Ident> =
                fields.named.iter().filter_map(|f| f.ident.as_ref()).collect();
            let field_strs: Vec<String> = field_names.iter().map(|i| i.to_string()).collect();
            Arms {
                to_beve: quote! {
                    #name::#variant { #(#field_names),* } => ::beve::rep::enum_to_beve_helper(
                        #index,
                        ::beve::rep::struct_to_beve_helper(vec![
                            #((#field_strs, ::beve::rep::BeveRep::to_beve(#field_names))),*
                        ]),
                    ),
                },
                into_beve: quote! {
                    #name::#variant { #(#field_names),* } => ::beve::rep::enum_to_beve_helper(
                        #index,
                        ::beve::rep::struct_to_beve_helper(vec![
                            #((#field_strs, ::beve::rep::BeveRep::into_beve(#field_names))),*
                        ]),
                    ),
                },
                from_beve: quote! {
                    #tag => {
                        #[allow(unused_mut, unused_variables)]
                        let mut fields =
                            ::beve::rep::struct_from_beve_helper(payload, &[#(#field_strs),*])?;
                        Ok(#name::#variant {
                            #(#field_names: ::beve::rep::pop_beve(&mut fields)?),*
                        })
                    }
                },
            }
        }
    }
}

pub fn beve_rep(name: &Ident, data: &DataEnum) -> TokenStream {
    let ident_string = name.to_string();

    if data.variants.is_empty() {
        return quote! {
            fn to_beve(&self) -> ::beve::Value { match *self {} }

            fn from_beve(v: ::beve::Value) -> ::beve::errors::Result<Self> {
                let (tag, _) = ::beve::rep::enum_from_beve_helper(v)?;
                Err(::beve::rep::unknown_variant(tag, #ident_string))
            }
        };
    }

    let arms: Vec<Arms> = data
        .variants
        .iter()
        .enumerate()
        .map(|(i, variant)| variant_arms(name, i as u32, &variant.ident, &variant.fields))
        .collect();
    let to_arms = arms.iter().map(|a| &a.to_beve);
    let into_arms = arms.iter().map(|a| &a.into_beve);
    let from_arms = arms.iter().map(|a| &a.from_beve);

    quote! {
        fn to_beve(&self) -> ::beve::Value {
            match self {
                #(#to_arms)*
            }
        }

        fn into_beve(self) -> ::beve::Value {
            match self {
                #(#into_arms)*
            }
        }

        fn from_beve(v: ::beve::Value) -> ::beve::errors::Result<Self> {
            let (tag, payload) = ::beve::rep::enum_from_beve_helper(v)?;
            match tag {
                #(#from_arms)*
                _ => Err(::beve::rep::unknown_variant(tag, #ident_string)),
            }
        }
    }
}
