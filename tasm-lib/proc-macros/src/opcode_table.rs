use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, ItemEnum};

use std::collections::HashMap;

pub fn opcode_table_impl(tokens: TokenStream) -> TokenStream {
    let def = parse_macro_input!(tokens as ItemEnum);
    match table_impl(&def) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn table_impl(def: &ItemEnum) -> syn::Result<TokenStream2> {
    let enum_name = &def.ident;
    let mut seen: HashMap<String, &syn::Ident> = HashMap::new();

    let rows = def
        .variants
        .iter()
        .map(|v| {
            let syn::Fields::Unit = v.fields else {
                return Err(syn::Error::new_spanned(
                    v,
                    "OpcodeTable only supports unit variants",
                ));
            };
            let var_name = &v.ident;
            let opcode = opcode_of(v)?;

            // the opcode is compared by its spelling, which is good enough for literals
            if let Some(other) = seen.insert(quote!(#opcode).to_string(), var_name) {
                return Err(syn::Error::new_spanned(
                    var_name,
                    format!("opcode {} is already used by {}", quote!(#opcode), other),
                ));
            }
            Ok((
                quote! { Self::#var_name, },
                quote! { Self::#var_name => #opcode, },
            ))
        })
        .collect::<syn::Result<Vec<_>>>()?;

    let (all_items, opcode_arms): (TokenStream2, TokenStream2) = itertools::multiunzip(rows);

    Ok(quote! {
        impl #enum_name {
            /// every entry of the table, in declaration order
            pub const ALL: &'static [Self] = &[#all_items];

            /// the number the target VM uses for this entry
            pub const fn opcode(self) -> i64 {
                match self {
                    #opcode_arms
                }
            }
        }
    })
}

/// reads the expression out of the single `#[opcode(..)]` attribute of a variant
fn opcode_of(v: &syn::Variant) -> syn::Result<syn::Expr> {
    let mut attrs = v.attrs.iter().filter(|a| a.path().is_ident("opcode"));
    let Some(attr) = attrs.next() else {
        return Err(syn::Error::new_spanned(
            &v.ident,
            "every variant needs an #[opcode(..)] attribute",
        ));
    };
    if let Some(extra) = attrs.next() {
        return Err(syn::Error::new_spanned(extra, "duplicate #[opcode(..)] attribute"));
    }
    attr.parse_args()
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_table() {
        let def: ItemEnum = parse_quote! {
            enum Table {
                #[opcode(1)]
                One,
                #[opcode(-2)]
                MinusTwo,
            }
        };
        let tokens = table_impl(&def).unwrap().to_string();
        assert!(tokens.contains("pub const ALL"));
        assert!(tokens.contains("Self :: MinusTwo => - 2"));
    }

    #[test]
    fn test_non_unit_variant() {
        let def: ItemEnum = parse_quote! {
            enum Table {
                #[opcode(1)]
                One(u8),
            }
        };
        let err = table_impl(&def).unwrap_err();
        assert_eq!(err.to_string(), "OpcodeTable only supports unit variants");
    }

    #[test]
    fn test_duplicate_opcode() {
        let def: ItemEnum = parse_quote! {
            enum Table {
                #[opcode(3)]
                A,
                #[opcode(3)]
                B,
            }
        };
        let err = table_impl(&def).unwrap_err();
        assert_eq!(err.to_string(), "opcode 3 is already used by A");
    }

    #[test]
    fn test_missing_attribute() {
        let def: ItemEnum = parse_quote! {
            enum Table {
                A,
            }
        };
        assert!(table_impl(&def).is_err());
    }
}
