// redact-derive/src/redact.rs
//! Implementation of #[derive(Redact)]

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::parse::ParseStream;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, Ident, Index, LitStr, Type};

/// How the walk treats one field.
enum Mode {
    /// `#[redact("...")]`
    Instruction(LitStr),
    /// `#[redact(nested)]`
    Nested,
    /// No attribute: the field is walked like a nested one, without metadata.
    Walk,
    /// `#[redact(skip)]`: copied by `Clone` only.
    Skip,
}

/// One field taking part in the walk, with the expression or binding used to
/// reach it.
struct WalkedField {
    spec_name: String,
    mode: Mode,
    access: TokenStream2,
    ty: Type,
}

impl WalkedField {
    /// Whether the field is listed in `field_specs()`.
    fn has_spec(&self) -> bool {
        matches!(self.mode, Mode::Instruction(_) | Mode::Nested)
    }
}

pub fn derive_redact_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;

    let (fields, body) = match &input.data {
        Data::Struct(data) => {
            let fields = struct_fields(&data.fields)?;
            let steps = walk_steps(&fields, 0, false);
            let body = quote! {
                let metadata = walker.metadata::<Self>()?;
                let walker = walker.enter_record();
                let mut out = ::core::clone::Clone::clone(self);
                #(#steps)*
                ::core::result::Result::Ok(out)
            };
            (fields, body)
        }
        Data::Enum(data) => {
            let mut fields: Vec<WalkedField> = Vec::new();
            let mut arms = Vec::new();
            for variant in &data.variants {
                let (walked, pattern) = variant_fields(&variant.ident, &variant.fields)?;
                let first_spec = fields.iter().filter(|f| f.has_spec()).count();
                let steps = walk_steps(&walked, first_spec, true);
                arms.push(quote! { #pattern => { #(#steps)* } });
                fields.extend(walked);
            }
            let body = if data.variants.is_empty() {
                quote! { match *self {} }
            } else {
                quote! {
                    let metadata = walker.metadata::<Self>()?;
                    let walker = walker.enter_record();
                    let mut out = ::core::clone::Clone::clone(self);
                    match &mut out {
                        #(#arms)*
                    }
                    ::core::result::Result::Ok(out)
                }
            };
            (fields, body)
        }
        Data::Union(data) => {
            return Err(syn::Error::new_spanned(
                data.union_token,
                "Redact cannot be derived for unions",
            ));
        }
    };

    let specs = fields.iter().filter_map(|field| {
        let spec_name = &field.spec_name;
        match &field.mode {
            Mode::Instruction(lit) => Some(quote! { ::redact_core::FieldSpec::instruction(#spec_name, #lit) }),
            Mode::Nested => Some(quote! { ::redact_core::FieldSpec::nested(#spec_name) }),
            Mode::Walk | Mode::Skip => None,
        }
    });

    let mut generics = input.generics.clone();
    if !generics.params.is_empty() {
        let where_clause = generics.make_where_clause();
        where_clause
            .predicates
            .push(syn::parse_quote! { Self: ::core::clone::Clone + 'static });
        for field in &fields {
            let ty = &field.ty;
            match field.mode {
                Mode::Instruction(_) => where_clause
                    .predicates
                    .push(syn::parse_quote! { #ty: ::redact_core::RedactField }),
                Mode::Nested | Mode::Walk => where_clause
                    .predicates
                    .push(syn::parse_quote! { #ty: ::redact_core::Redact }),
                Mode::Skip => {}
            }
        }
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::redact_core::Redact for #name #ty_generics #where_clause {
            #[allow(unused_variables, unused_mut)]
            fn walk(
                &self,
                walker: &::redact_core::Walker<'_>,
            ) -> ::core::result::Result<Self, ::redact_core::RedactError> {
                #body
            }
        }

        impl #impl_generics ::redact_core::RedactRecord for #name #ty_generics #where_clause {
            fn field_specs() -> ::std::vec::Vec<::redact_core::FieldSpec> {
                ::std::vec![#(#specs),*]
            }
        }
    })
}

fn struct_fields(fields: &Fields) -> syn::Result<Vec<WalkedField>> {
    let mut walked = Vec::new();
    for (position, field) in fields.iter().enumerate() {
        let mode = parse_mode(&field.attrs)?;
        if matches!(mode, Mode::Skip) {
            continue;
        }
        let (spec_name, access) = match &field.ident {
            Some(ident) => (ident.unraw().to_string(), quote! { out.#ident }),
            None => {
                let index = Index::from(position);
                (position.to_string(), quote! { out.#index })
            }
        };
        walked.push(WalkedField {
            spec_name,
            mode,
            access,
            ty: field.ty.clone(),
        });
    }
    Ok(walked)
}

/// Collects the walked fields of one enum variant and the pattern that binds
/// them as `&mut` references.
fn variant_fields(variant: &Ident, fields: &Fields) -> syn::Result<(Vec<WalkedField>, TokenStream2)> {
    let mut walked = Vec::new();
    let pattern = match fields {
        Fields::Named(named) => {
            let mut bindings = Vec::new();
            for field in &named.named {
                let mode = parse_mode(&field.attrs)?;
                if matches!(mode, Mode::Skip) {
                    continue;
                }
                let Some(ident) = field.ident.as_ref() else {
                    continue;
                };
                let binding = format_ident!("__redact_{}", ident.unraw());
                bindings.push(quote! { #ident: #binding });
                walked.push(WalkedField {
                    spec_name: format!("{}.{}", variant, ident.unraw()),
                    mode,
                    access: quote! { #binding },
                    ty: field.ty.clone(),
                });
            }
            quote! { Self::#variant { #(#bindings,)* .. } }
        }
        Fields::Unnamed(unnamed) => {
            let mut bindings = Vec::new();
            for (position, field) in unnamed.unnamed.iter().enumerate() {
                let mode = parse_mode(&field.attrs)?;
                if matches!(mode, Mode::Skip) {
                    bindings.push(quote! { _ });
                    continue;
                }
                let binding = format_ident!("__redact_{}", position);
                bindings.push(quote! { #binding });
                walked.push(WalkedField {
                    spec_name: format!("{}.{}", variant, position),
                    mode,
                    access: quote! { #binding },
                    ty: field.ty.clone(),
                });
            }
            quote! { Self::#variant(#(#bindings),*) }
        }
        Fields::Unit => quote! { Self::#variant },
    };
    Ok((walked, pattern))
}

/// The statements that redact the given fields of `out`. Metadata indices
/// start at `first_spec`. In enum arms (`bound`) each field is already bound
/// as `&mut T`.
fn walk_steps(fields: &[WalkedField], first_spec: usize, bound: bool) -> Vec<TokenStream2> {
    let mut index = first_spec;
    let mut steps = Vec::new();
    for field in fields {
        let access = &field.access;
        let step = match (&field.mode, bound) {
            (Mode::Instruction(_), false) => quote! {
                walker.apply(&metadata, #index, &mut #access)?;
            },
            (Mode::Instruction(_), true) => quote! {
                walker.apply(&metadata, #index, #access)?;
            },
            (Mode::Nested | Mode::Walk, false) => quote! {
                #access = ::redact_core::Redact::walk(&#access, &walker)?;
            },
            (Mode::Nested | Mode::Walk, true) => quote! {
                *#access = ::redact_core::Redact::walk(&*#access, &walker)?;
            },
            (Mode::Skip, _) => continue,
        };
        if field.has_spec() {
            index += 1;
        }
        steps.push(step);
    }
    steps
}

fn parse_mode(attrs: &[Attribute]) -> syn::Result<Mode> {
    let mut found: Option<Mode> = None;
    for attr in attrs {
        if !attr.path().is_ident("redact") {
            continue;
        }
        if found.is_some() {
            return Err(syn::Error::new_spanned(attr, "duplicate #[redact] attribute"));
        }
        let mode = attr.parse_args_with(|input: ParseStream| {
            if input.peek(LitStr) {
                let lit: LitStr = input.parse()?;
                if lit.value().trim().is_empty() {
                    return Err(syn::Error::new(lit.span(), "redact instruction cannot be empty"));
                }
                return Ok(Mode::Instruction(lit));
            }
            let ident: Ident = input.parse()?;
            if ident == "nested" {
                Ok(Mode::Nested)
            } else if ident == "skip" {
                Ok(Mode::Skip)
            } else {
                Err(syn::Error::new(
                    ident.span(),
                    "expected an instruction string, `nested` or `skip`",
                ))
            }
        })?;
        found = Some(mode);
    }
    Ok(found.unwrap_or(Mode::Walk))
}
