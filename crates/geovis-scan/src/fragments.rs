//! Curated word lists backing the mention heuristics.
//!
//! These are deliberate precision/recall tradeoffs, not exhaustive
//! dictionaries. False positives from short common fragments are an
//! accepted cost of catching "Project Hub" when the domain is
//! `projecthub.io`.

/// Common brand word-fragments used by the compound-split heuristic.
///
/// A brand token is split at every position; when both halves appear here,
/// an alternate pattern allowing a space or hyphen between them is added.
/// Kept lowercase and roughly alphabetical for scanning by eye.
pub(crate) const BRAND_FRAGMENTS: &[&str] = &[
    "app", "base", "bit", "board", "boost", "box", "bridge", "byte",
    "camp", "cart", "cast", "chat", "check", "cloud", "club", "code", "core",
    "craft", "crew", "dash", "data", "deck", "desk", "dock", "drive", "drop",
    "edge", "feed", "field", "find", "fire", "flow", "forge", "form", "frame",
    "fund", "gear", "grid", "guard", "hive", "hub", "jet", "kit", "lab",
    "labs", "leaf", "light", "line", "link", "list", "live", "lock", "loop",
    "mail", "map", "mate", "mind", "mint", "nest", "net", "node", "note",
    "pad", "page", "path", "pay", "pilot", "pipe", "plan", "play", "point",
    "port", "post", "press", "project", "pulse", "push", "rank", "reach",
    "rocket", "room", "scan", "seed", "shift", "ship", "shop", "site",
    "smart", "snap", "space", "spark", "spot", "stack", "star", "stream",
    "studio", "sync", "task", "team", "tech", "time", "tool", "track",
    "trail", "vault", "verse", "view", "wave", "web", "wise", "work", "zone",
];

/// Disclaiming phrases that mark a negative mention.
///
/// When any of these appear in an answer, the AI is explicitly saying it
/// does *not* know the brand; body-text matches in that answer must never
/// score as positive signals.
pub(crate) const NEGATIVE_PHRASES: &[&str] = &[
    "i don't recognize",
    "i do not recognize",
    "don't recognize that",
    "not aware of",
    "no information available",
    "no information about",
    "unable to find",
    "couldn't find any information",
    "could not find any information",
    "i don't have information",
    "i do not have information",
    "not familiar with",
    "doesn't appear to be",
    "does not appear to be",
];

/// Top-level-domain suffixes the domain-shaped token pattern accepts.
pub(crate) const TLD_SUFFIXES: &[&str] = &[
    "com", "net", "org", "io", "ai", "co", "app", "dev", "me", "so", "gg",
    "tv", "fm", "to", "ly", "sh", "xyz", "tech", "site", "online", "store",
    "shop", "cloud", "digital", "agency", "studio", "design", "info", "biz",
    "us", "uk", "ca", "de", "fr", "au", "in", "jp", "br", "nl", "se",
];
