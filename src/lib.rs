//! # reflect-config
//!
//! Generates GraalVM native-image reflection configuration from compiled
//! classes and jar dependencies.
//!
//! ## Architecture
//!
//! - **classfile**: Header-only class file parsing (name, superclass, interfaces, visibility)
//! - **matcher**: Compiled superclass/interface pattern sets and relocation rules
//! - **scan**: Class file discovery in class folders and jar archives
//! - **descriptor**: Reflection descriptor entries and output file rendering
//! - **generate**: End-to-end descriptor generation
//! - **cli**: Command line interface

pub mod classfile;
pub mod cli;
pub mod descriptor;
pub mod generate;
pub mod matcher;
pub mod scan;
