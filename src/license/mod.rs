//! License expression handling.
//!
//! Declarations are normalized to SPDX syntax, parsed into an algebraic
//! [`LicenseExpr`], combined and simplified in the SPDX vocabulary, and only
//! then translated into recipe license names via a [`LicenseVocabulary`].

mod expression;
mod normalize;
mod vocabulary;

pub use expression::{combine_and, LicenseExpr, LicenseId};
pub use normalize::normalize;
pub use vocabulary::{translate, GentooVocabulary, LicenseVocabulary, RenderedExpression};
