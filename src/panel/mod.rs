// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Panel module.
//!
//! An editor panel drives the core through tagged JSON messages. The
//! [`PanelController`] maps each inbound event to repository commands or a
//! generation request; [`serve`] carries the messages over any byte stream.

mod controller;
mod protocol;
mod serve;

pub use controller::PanelController;
pub use protocol::{InboundEvent, OutboundEvent};
pub use serve::{serve, serve_stdio};
