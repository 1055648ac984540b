// In: src/bridge/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Bridge Layer
// ====================================================================================
//
// The `bridge` is the public calling surface of sortnest. Every ordering operation
// is reachable in two equivalent forms:
//
//   * static:   `stateless_api::argsort(&x, &cfg, &mapping, out)` where `x` is a
//               bare array, a container, or any `Value`;
//   * instance: `container.argsort(&cfg, &mapping, out)`, which forwards to the
//               static form with `x = container`.
//
// Data Flow (one call):
//
//   1. [Facade (stateless_api / Container methods)] -> Receives `x`, args, configs
//         |
//         `-> delegates to ->
//
//   2. [OrderingDispatcher] -> Picks the driving operand and hands a per-leaf
//         |                   closure to the structural mapper
//         |
//         `-> for each selected leaf ->
//
//   3. [StructuralMapper] -> Locates per-leaf args, calls the closure, writes `out`
//         |
//         `-> closure resolves the backend from the leaf's tag ->
//
//   4. [BackendRegistry -> OrderingBackend] -> Runs the ordering primitive
//
// ====================================================================================
pub(crate) mod container_methods;
pub mod dispatcher;
pub mod stateless_api;

// --- Stateful API (explicit registry) ---
pub use dispatcher::OrderingDispatcher;

// --- Stateless API (process-wide registry) ---
pub use stateless_api::{argpartition, argsort, msort, searchsorted, sort};

#[cfg(test)]
mod tests;
