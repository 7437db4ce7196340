//! The `lumina` binary: relay server plus the CLI that drives the
//! pipeline end-to-end.
//!
//! The relay is the only server-side piece — a thin axum app that injects
//! the upstream credential and forwards generation requests verbatim. The
//! CLI plays the role of the calling collaborator: it owns the mutable
//! state between pipeline calls (quiz answers, spaced-repetition
//! schedules) and renders whatever typed result or error comes back.

pub mod cli;
pub mod relay;
pub mod youtube;
