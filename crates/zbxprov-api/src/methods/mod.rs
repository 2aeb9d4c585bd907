// Remote method wrappers, one file per object family.
//
// Each file adds inherent methods to `ZabbixClient`; shared envelope
// handling stays in `client.rs`.

mod host;
mod hostgroup;
mod interface;
mod session;
mod template;
