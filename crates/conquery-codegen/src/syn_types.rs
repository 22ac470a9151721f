//! Type helper utilities for syn type analysis.

/// The single generic argument of `Wrapper<T>` when the last path segment is `wrapper`.
fn single_arg<'a>(ty: &'a syn::Type, wrapper: &str) -> Option<&'a syn::Type> {
    let syn::Type::Path(type_path) = ty else {
        return None;
    };
    let seg = type_path.path.segments.last()?;
    if seg.ident != wrapper {
        return None;
    }
    let syn::PathArguments::AngleBracketed(args) = &seg.arguments else {
        return None;
    };
    if args.args.len() != 1 {
        return None;
    }
    let syn::GenericArgument::Type(inner) = args.args.first()? else {
        return None;
    };
    Some(inner)
}

/// Extract the inner type T from Option<T>, or return None if not an Option type.
///
/// Recognizes `Option<T>`, `std::option::Option<T>`, and `core::option::Option<T>`.
pub fn option_inner(ty: &syn::Type) -> Option<&syn::Type> {
    single_arg(ty, "Option")
}

/// Extract the inner type T from Vec<T>, or return None if not a Vec type.
pub fn vec_inner(ty: &syn::Type) -> Option<&syn::Type> {
    single_arg(ty, "Vec")
}

/// Extract the inner type T from Box<T>, or return None if not a Box type.
pub fn box_inner(ty: &syn::Type) -> Option<&syn::Type> {
    single_arg(ty, "Box")
}

/// `T` or `Box<T>` -> `T`.
pub fn unboxed(ty: &syn::Type) -> &syn::Type {
    box_inner(ty).unwrap_or(ty)
}

/// Whether the last path segment of `ty` is `name` with no generic arguments.
pub fn is_plain(ty: &syn::Type, name: &str) -> bool {
    let syn::Type::Path(type_path) = ty else {
        return false;
    };
    type_path
        .path
        .segments
        .last()
        .is_some_and(|seg| seg.ident == name && seg.arguments.is_none())
}

pub fn is_bool(ty: &syn::Type) -> bool {
    is_plain(ty, "bool")
}

pub fn is_page_query(ty: &syn::Type) -> bool {
    is_plain(ty, "PageQuery")
}
