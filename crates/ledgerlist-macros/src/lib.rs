//! Procedural macros for LedgerList trackable items.
//!
//! This crate provides the `#[derive(Trackable)]` macro, which generates the
//! `Trackable` and `AsTrackable` impls for an item type by delegating to an
//! embedded `TrackState` field.
//!
//! # Usage
//!
//! ```ignore
//! use ledgerlist_core::{Property, TrackState};
//! use ledgerlist_macros::Trackable;
//!
//! #[derive(Trackable)]
//! struct Contact {
//!     track_state: TrackState,
//!
//!     name: Property<String>,
//!     email: Property<String>,
//! }
//! ```
//!
//! By default the macro delegates to a field named `track_state`. A
//! struct-level attribute selects a different field:
//!
//! ```ignore
//! #[derive(Trackable)]
//! #[trackable(field = "tracking")]
//! struct Order {
//!     tracking: TrackState,
//!     quantity: Property<u32>,
//! }
//! ```

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{Attribute, Data, DeriveInput, Expr, ExprLit, Fields, Lit, parse_macro_input};

/// Derive the `Trackable` and `AsTrackable` traits.
///
/// The type must have a `TrackState` field (named `track_state` unless
/// overridden with `#[trackable(field = "...")]`). The generated impls
/// delegate the item state and the change signal to that field; content
/// setters on the type remain responsible for calling
/// `TrackState::notify(name)` when a property actually changes.
///
/// # Example
///
/// ```ignore
/// use ledgerlist::prelude::*;
///
/// #[derive(Trackable)]
/// struct Task {
///     track_state: TrackState,
///
///     title: Property<String>,
///     done: Property<bool>,
/// }
/// ```
#[proc_macro_derive(Trackable, attributes(trackable))]
pub fn derive_trackable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match impl_derive_trackable(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Parsed struct-level trackable attributes.
struct TrackableAttrs {
    field: Option<String>,
}

fn impl_derive_trackable(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let attrs = parse_trackable_attrs(&input.attrs)?;
    let field_name = attrs.field.unwrap_or_else(|| "track_state".to_string());
    let field_ident = format_ident!("{}", field_name);

    // Get struct fields
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Trackable derive only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "Trackable derive only supports structs",
            ));
        }
    };

    // The delegation target must exist
    let has_field = fields
        .iter()
        .any(|f| f.ident.as_ref().is_some_and(|i| *i == field_ident));

    if !has_field {
        return Err(syn::Error::new_spanned(
            input,
            format!("Trackable derive requires a `{field_name}: TrackState` field"),
        ));
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics ledgerlist_core::trackable::Trackable for #struct_name #ty_generics #where_clause {
            fn item_state(&self) -> ledgerlist_core::trackable::ItemState {
                self.#field_ident.item_state()
            }

            fn set_item_state(&self, state: ledgerlist_core::trackable::ItemState) {
                self.#field_ident.set_item_state(state);
            }

            fn changed(&self) -> &ledgerlist_core::signal::Signal<&'static str> {
                self.#field_ident.changed()
            }
        }

        impl #impl_generics ledgerlist_core::trackable::AsTrackable for #struct_name #ty_generics #where_clause {
            fn as_trackable(&self) -> Option<&dyn ledgerlist_core::trackable::Trackable> {
                Some(self)
            }
        }
    };

    Ok(expanded)
}

/// Parse struct-level #[trackable(...)] attributes.
fn parse_trackable_attrs(attrs: &[Attribute]) -> syn::Result<TrackableAttrs> {
    let mut result = TrackableAttrs { field: None };

    for attr in attrs {
        if !attr.path().is_ident("trackable") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("field") {
                let value = meta.value()?;
                let expr: Expr = value.parse()?;
                if let Expr::Lit(ExprLit {
                    lit: Lit::Str(s), ..
                }) = expr
                {
                    result.field = Some(s.value());
                    Ok(())
                } else {
                    Err(meta.error("expected a string literal: field = \"name\""))
                }
            } else {
                Err(meta.error("unknown trackable attribute"))
            }
        })?;
    }

    Ok(result)
}
