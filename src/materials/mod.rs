// Copyright @yucwang 2023

pub mod diffuse;
pub mod emissive;
pub mod mirror;
