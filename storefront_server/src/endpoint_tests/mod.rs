mod helpers;
mod mocks;

mod orders;
mod relays;
mod webhook;
