//=========================================================================
// Controller Collaborators
//
// Everything the controller wires together, grouped by concern.
//
// Components:
// - `config`: options, defaults, startup argument vector
// - `error`: configuration / lifecycle / boundary failure kinds
// - `boundary`: native engine contract and the camera move relay
// - `modules`: the six feature modules and their fixed dispatch order
// - `surface`: drawable surface container and size resolution
// - `events`: facade event stream and the transition notifier
// - `facade`: user-facing map object, markers, surface input
//
// Notes:
// Everything here runs on the engine's callback thread. Shared state is
// `Rc`/`RefCell`; nothing in this tree is `Send`.
//
//=========================================================================

pub mod boundary;
pub mod config;
pub mod error;
pub mod events;
pub mod facade;
pub mod modules;
pub mod surface;
