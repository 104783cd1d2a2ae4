// SPDX-License-Identifier: MPL-2.0
//! `vegas_lang_changer` switches the display language of every VEGAS Pro and
//! Vegas Movie Studio release installed on a Windows machine.
//!
//! A change runs as a pipeline: the current `ULangID` values are backed up
//! to a `.reg` file, the new id is written into each selected release, the
//! matching locale `.cfg` file is installed where the release needs one, and
//! the plugin caches are cleared so VEGAS rebuilds them in the new language.
//!
//! The registry sits behind the [`registry::ConfigStore`] port, so the whole
//! pipeline also runs against [`registry::memory::MemoryRegistry`].

#![doc(html_root_url = "https://docs.rs/vegas_lang_changer/1.1.0")]

pub mod assets;
pub mod backup;
pub mod cache;
pub mod catalog;
pub mod cli;
pub mod compat;
pub mod config;
pub mod discovery;
pub mod error;
pub mod i18n;
pub mod language;
pub mod mutate;
pub mod paths;
pub mod pipeline;
pub mod registry;
pub mod report;
pub mod session;
