//! # cimxml-profiles: CIM profile recognition and the property registry
//!
//! Recognizes CIM-16/17/18 profile graphs and header profiles (§4.F),
//! resolves CIM primitive-type names to XSD datatypes (§4.G), and compiles
//! per-profile property→datatype maps that the parser consults for
//! profile-aware literal typing (§4.I).

pub mod primitive_types;
pub mod profile;
pub mod registry;

pub use primitive_types::{fallback_datatype, primitive_datatype, register_primitive_type};
pub use profile::{CimProfile, Profile, ProfileKind, HEADER_PROFILE_SYNTHETIC_KEYWORD};
pub use registry::{compile_property_map, PropertyInfo, PropertyMap, ProfileRegistry};
