//! Application layer orchestrating a checkout.
//!
//! `CheckoutFlow` is the entry point. It composes the four stages of a payment:
//! signing (`initiator`), handing off to the hosted widget (`bridge`), polling the
//! backend for the authoritative status (`reconciler`) and the final redirect
//! (`router`). Everything runs cooperatively on one task per checkout.

pub mod bridge;
pub mod checkout;
pub mod initiator;
pub mod reconciler;
pub mod router;
