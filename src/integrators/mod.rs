// Copyright @yucwang 2026

pub mod mcmc;
pub mod path;
