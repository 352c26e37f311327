use proc_macro2::TokenStream;
use quote::quote;
use syn::{DataStruct, Fields, Ident, Index};

pub fn beve_rep(name: &Ident, data: &DataStruct) -> TokenStream {
    let ident_string = name.to_string();
    match &data.fields {
        // C-style structs
        Fields::Named(fields) => {
            let field_names: Vec<&Ident> =
                fields.named.iter().filter_map(|f| f.ident.as_ref()).collect();
            let field_strs: Vec<String> = field_names.iter().map(|i| i.to_string()).collect();

            quote! {
                fn to_beve(&self) -> ::beve::Value {
                    ::beve::rep::struct_to_beve_helper(vec![
                        #((#field_strs, ::beve::rep::BeveRep::to_beve(&self.#field_names))),*
                    ])
                }

                fn into_beve(self) -> ::beve::Value {
                    ::beve::rep::struct_to_beve_helper(vec![
                        #((#field_strs, ::beve::rep::BeveRep::into_beve(self.#field_names))),*
                    ])
                }

                fn from_beve(v: ::beve::Value) -> ::beve::errors::Result<Self> {
                    #[allow(unused_mut, unused_variables)]
                    let mut fields = ::beve::rep::struct_from_beve_helper(v, &[#(#field_strs),*])?;
                    Ok(#name {
                        #(#field_names: ::beve::rep::pop_beve(&mut fields)?),*
                    })
                }
            }
        }
        // Tuple structs
        Fields::Unnamed(fields) => {
            let len = fields.unnamed.len();
            let indices: Vec<Index> = (0..len).map(Index::from).collect();
            let popped = (0..len).map(|_| quote! { ::beve::rep::pop_beve(&mut elems)? });

            quote! {
                fn to_beve(&self) -> ::beve::Value {
                    ::beve::Value::Array(::beve::Array::Generic(vec![
                        #(::beve::rep::BeveRep::to_beve(&self.#indices)),*
                    ]))
                }

                fn into_beve(self) -> ::beve::Value {
                    ::beve::Value::Array(::beve::Array::Generic(vec![
                        #(::beve::rep::BeveRep::into_beve(self.#indices)),*
                    ]))
                }

                fn from_beve(v: ::beve::Value) -> ::beve::errors::Result<Self> {
                    #[allow(unused_mut, unused_variables)]
                    let mut elems = ::beve::rep::tuple_from_beve_helper(v, #len)?;
                    Ok(#name(#(#popped),*))
                }
            }
        }
        // Unit-like structs
        Fields::Unit => quote! {
            fn to_beve(&self) -> ::beve::Value { ::beve::Value::Null }

            fn from_beve(v: ::beve::Value) -> ::beve::errors::Result<Self> {
                ::beve::rep::unit_from_beve_helper(v, #ident_string)?;
                Ok(#name)
            }
        },
    }
}
