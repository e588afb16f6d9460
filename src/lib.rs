// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod config;         // router config + loader
pub mod demo;           // sharpen pencils router
pub mod engine;         // workflows, registry, matcher, router
pub mod errors;         // error handling
pub mod observability;  // log messages + subscriber setup
pub mod traits;         // schema, step and handler seams
