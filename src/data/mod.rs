/// Data layer: core types, loading, and normalization.
///
/// Architecture:
/// ```text
///   data/cleaned/*.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  rows × named columns, dynamically-typed cells
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ normalize   │  canonical names, numeric coercion (bad → Null)
///   └────────────┘
/// ```
pub mod loader;
pub mod model;
pub mod normalize;
