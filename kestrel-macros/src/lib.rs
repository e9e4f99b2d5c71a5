//! Derive macro for `kestrel::Reflect`.
//!
//! Generated code refers to `::kestrel`, so depend on the facade crate
//! rather than on this one directly.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Attribute, Data, DeriveInput, Fields, LitStr, parse_macro_input, parse_quote};

/// Derives `Reflect` for a struct with named fields (or a unit struct).
///
/// Every field type must itself implement `Reflect`, except fields marked
/// `#[kestrel(skip)]`, which are left out of the shape entirely.
#[proc_macro_derive(Reflect, attributes(kestrel))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

#[derive(Default)]
struct FieldAttrs {
    rename: Option<LitStr>,
    aliases: Vec<LitStr>,
    omit_empty: bool,
    skip: bool,
}

fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut parsed = FieldAttrs::default();
    for attr in attrs {
        if !attr.path().is_ident("kestrel") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                if parsed.rename.is_some() {
                    return Err(meta.error("duplicate `rename`"));
                }
                parsed.rename = Some(meta.value()?.parse()?);
                return Ok(());
            }
            if meta.path.is_ident("alias") {
                parsed.aliases.push(meta.value()?.parse()?);
                return Ok(());
            }
            if meta.path.is_ident("omit_empty") {
                parsed.omit_empty = true;
                return Ok(());
            }
            if meta.path.is_ident("skip") {
                parsed.skip = true;
                return Ok(());
            }
            Err(meta.error(
                "unknown kestrel attribute. Supported: rename, alias, omit_empty, skip",
            ))
        })?;
    }
    Ok(parsed)
}

fn expand(input: DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;

    let fields: Vec<&syn::Field> = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => named.named.iter().collect(),
            Fields::Unit => Vec::new(),
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Reflect can only be derived for structs with named fields",
                ));
            }
        },
        Data::Enum(_) | Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                name,
                "Reflect can only be derived for structs",
            ));
        }
    };

    if let Some(lifetime) = input.generics.lifetimes().next() {
        return Err(syn::Error::new_spanned(
            lifetime,
            "Reflect types must be 'static and cannot have lifetime parameters",
        ));
    }

    let mut generics = input.generics.clone();
    for param in generics.type_params_mut() {
        param.bounds.push(parse_quote!(::kestrel::Reflect));
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let mut field_exprs = Vec::with_capacity(fields.len());
    for field in fields {
        let attrs = parse_field_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }
        let Some(ident) = &field.ident else {
            return Err(syn::Error::new_spanned(field, "expected a named field"));
        };
        let ty = &field.ty;
        let field_name = ident.unraw().to_string();

        let mut expr = quote! {
            ::kestrel::Field::new(
                #field_name,
                ::kestrel::shape_of::<#ty>,
                |record| {
                    let record = record.downcast_ref::<Self>()?;
                    ::core::option::Option::Some(&record.#ident as &dyn ::core::any::Any)
                },
                |record| {
                    let record = record.downcast_mut::<Self>()?;
                    ::core::option::Option::Some(&mut record.#ident as &mut dyn ::core::any::Any)
                },
            )
        };
        if let Some(rename) = &attrs.rename {
            expr = quote! { #expr.rename(#rename) };
        }
        if !attrs.aliases.is_empty() {
            let aliases = &attrs.aliases;
            expr = quote! { #expr.aliases(&[#(#aliases),*]) };
        }
        if attrs.omit_empty {
            expr = quote! { #expr.omit_empty() };
        }
        field_exprs.push(expr);
    }

    let type_identifier = name.unraw().to_string();
    let field_count = field_exprs.len();

    Ok(quote! {
        #[automatically_derived]
        impl #impl_generics ::kestrel::Reflect for #name #ty_generics #where_clause {
            const SHAPE: &'static ::kestrel::Shape = &const {
                ::kestrel::Shape {
                    id: ::core::any::TypeId::of::<Self>,
                    type_identifier: #type_identifier,
                    type_name: ::core::any::type_name::<Self>,
                    def: ::kestrel::Def::Struct(::kestrel::StructDef::new(&const {
                        let fields: [::kestrel::Field; #field_count] = [#(#field_exprs),*];
                        fields
                    })),
                }
            };
        }
    })
}
