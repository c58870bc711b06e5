use proc_macro::TokenStream;
use proc_macro2::{Ident, Span, TokenStream as TokenStream2};
use proc_macro_crate::{FoundCrate, crate_name};
use quote::quote;
use syn::{Data, DeriveInput, Fields, parse_macro_input};

/// Turns a struct with named fields into the initial values of a form.
///
/// Every field becomes one entry keyed by its name, in declaration order.
/// Field types need `Into<FormValue>`; nested structs deriving `FormValues`
/// become nested groups.
#[proc_macro_derive(FormValues)]
pub fn derive_form_values(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    if !input.generics.params.is_empty() {
        return syn::Error::new_spanned(
            input.ident,
            "FormValues derive currently supports only non-generic structs",
        )
        .to_compile_error()
        .into();
    }

    let model_ident = input.ident;
    let named_fields = match input.data {
        Data::Struct(data) => match data.fields {
            Fields::Named(fields) => fields.named,
            _ => {
                return syn::Error::new_spanned(
                    model_ident,
                    "FormValues derive requires a struct with named fields",
                )
                .to_compile_error()
                .into();
            }
        },
        _ => {
            return syn::Error::new_spanned(
                model_ident,
                "FormValues derive is only supported on structs",
            )
            .to_compile_error()
            .into();
        }
    };

    let trellis = trellis_path();
    let capacity = named_fields.len();
    let inserts = named_fields
        .into_iter()
        .filter_map(|field| field.ident)
        .map(|field_ident| {
            let key = field_ident.to_string();
            quote! {
                values.insert(
                    ::std::string::String::from(#key),
                    #trellis::form::FormValue::from(model.#field_ident),
                );
            }
        });

    quote! {
        impl ::core::convert::From<#model_ident> for #trellis::form::FormMap {
            fn from(model: #model_ident) -> Self {
                let mut values = #trellis::form::FormMap::with_capacity(#capacity);
                #(#inserts)*
                values
            }
        }

        impl ::core::convert::From<#model_ident> for #trellis::form::FormValue {
            fn from(model: #model_ident) -> Self {
                #trellis::form::FormValue::Map(#trellis::form::FormMap::from(model))
            }
        }
    }
    .into()
}

fn trellis_path() -> TokenStream2 {
    match crate_name("trellis") {
        Ok(FoundCrate::Name(name)) => {
            let ident = Ident::new(&name, Span::call_site());
            quote!(::#ident)
        }
        Ok(FoundCrate::Itself) => quote!(crate),
        Err(_) => quote!(::trellis),
    }
}
