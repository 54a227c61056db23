/*!
caminos-noc
=====

This crate provides the virtual channel credit accounting and the route computation of a router of a network-on-chip. It is intended to be driven by a cycle-level simulator, which owns the clock, the switch allocation and the links.

# Usage

This crate is `caminos-noc`. To use it add `caminos-noc` to your dependencies in your project's `Cargo.toml`.

```toml
[dependencies]
caminos-noc = "0.1"
```

# Public Interface

A [Router](router::Router) is built from a configuration object. For example, a router of a 4x4 torus using the adaptive GOAL routing is

```ignore
Router {
	virtual_networks: 3,
	virtual_channels_per_vnet: 6,
	buffer_depth: 4,
	routing: GOAL,
	torus_extents: [4,4],
	ordered_vnets: [true,false,false],
	ports: ["Local","dim0_pos","dim0_neg","dim1_pos","dim1_neg"],
}
```

The available routings are
* `Table`: the static routing table of the router, filled with `routes` and `weights` or through [RouteComputation::add_route](routing::RouteComputation::add_route). Entries with the least weight reaching the destination are candidates. Ordered virtual networks take the first candidate and the rest a random one.
* `XY`: dimension order in a mesh with `mesh_columns` columns. Ports are labelled `East`, `West`, `North` and `South`.
* `Ring`: shortest arc in a ring of `ring_size` routers. Ports are labelled `East` and `West`.
* `DOR`: dimension order in a torus of `torus_extents`. Ports are labelled `dim{k}_pos` and `dim{k}_neg`.
* `GOAL`: adaptive in a torus, with the direction of each dimension drawn at the first hop with probability favouring the shorter arc.
* `MINAD`: adaptive in a torus, always in the direction of the shorter arc.

Every router also has `Local` ports toward its endpoints. Packets for endpoints of the current router always use the routing table.

The whole configuration is

* `virtual_networks`: the number of traffic classes.
* `virtual_channels_per_vnet`: the size of the pool of virtual channels of each virtual network. At least 2 for `Ring` and `DOR`, and at least 3 for `GOAL` and `MINAD`.
* `buffer_depth`: the credits of each virtual channel.
* `routing`: one of the above.
* `torus_extents`, `mesh_columns`, `mesh_rows`, `ring_size`: the geometry required by the routing.
* `ordered_vnets`: whether each virtual network requires in-order delivery. Missing entries are unordered.
* `ports`: the direction label of each output port.
* `inports`: the direction label of each input port. By default the same as `ports`.
* `routes`: for each output port, for each virtual network, the endpoints reachable through it.
* `weights`: for each output port, its weight for the table. By default 1.

The flow of credits is driven by [EventGeneration](event::EventGeneration)s. A credit sent back by the next router is given to [OutputPort::deliver_credit](router::output_port::OutputPort::deliver_credit), whose requested wakeups the scheduler returns to [Router::process](router::Router::process).

*/

pub mod config_parser;
pub mod config;
pub mod error;
pub mod quantify;
pub mod event;
pub mod topology;
pub mod routing;
pub mod router;

use std::rc::Rc;
use std::cell::{RefCell};
use quantifiable_derive::Quantifiable;//the derive macro
use event::Time;
use routing::RouteInfo;

///Minimal unit exchanged between routers.
#[derive(Quantifiable)]
#[derive(Debug)]
pub struct Flit
{
	///The packet to what this flit belongs
	pub packet: Rc<Packet>,
	///position inside the packet
	pub index: usize,
	///The virtual channel in which this flit should be inserted
	pub virtual_channel: RefCell<Option<usize>>,
}

///A portion of a message. They are divided into flits.
///All flits must go through the same virtual channel without flits of other packets in between.
#[derive(Quantifiable)]
#[derive(Debug)]
pub struct Packet
{
	///Number of flits
	pub size: usize,
	///Information for the routing
	pub route_info: RefCell<RouteInfo>,
	///The message to what this packet belongs.
	pub message: Rc<Message>,
	///position inside the message
	pub index: usize,
}

///An application message, broken into packets
#[derive(Quantifiable)]
#[derive(Debug)]
pub struct Message
{
	///Endpoint that created the message.
	pub origin: usize,
	///Endpoint that is the destination of the message.
	pub destination: usize,
	///Memory address the message refers to, if any. Functional accesses look for it.
	pub address: Option<u64>,
	///The payload.
	pub data: RefCell<Vec<u8>>,
	///Cycle when the message was created.
	pub creation_cycle: Time,
}

impl Flit
{
	///Whether the flit is leading a packet.
	pub fn is_begin(&self) -> bool
	{
		self.index==0
	}
	///Whether this flit is the last one of a packet.
	pub fn is_end(&self) -> bool
	{
		self.index+1==self.packet.size
	}
	pub fn address(&self) -> Option<u64>
	{
		self.packet.message.address
	}
}

impl Packet
{
	///Break a packet into its flits, none of them with a virtual channel yet.
	pub fn into_flits(self:Rc<Self>) -> Vec<Rc<Flit>>
	{
		(0..self.size).map(|index|Rc::new(Flit{
			packet: self.clone(),
			index,
			virtual_channel: RefCell::new(None),
		})).collect()
	}
}
