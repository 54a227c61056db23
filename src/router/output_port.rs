/*!

An [OutputPort] keeps the credits of the virtual channels of the next router, the queue of flits waiting for the link, and the link by which the credits come back.

The virtual channels of each virtual network form a contiguous pool of `virtual_channels_per_vnet` channels. Which part of the pool a packet may take depends on the routing and on the checkpoint of the dimension of the port, see [VirtualChannelPartition]. The same rule serves `select_free_vc`, `count_free_vc` and `has_free_vc`.

*/

use std::ops::Range;
use std::rc::Rc;
use std::mem::{size_of};
use log::{debug,trace};
use quantifiable_derive::Quantifiable;//the derive macro
use crate::Flit;
use crate::event::{Event,EventGeneration,CyclePosition,Time};
use crate::quantify::Quantifiable;
use crate::topology::PortDirection;
use super::{Buffer,CreditLink,CreditMessage};
use super::virtual_channel::{VirtualChannel,VirtualChannelState};

///How the pool of virtual channels of a virtual network is split to break cyclic dependencies.
#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub enum VirtualChannelPartition
{
	///The whole pool is eligible. Table and mesh routings.
	Whole,
	///Lower half once the wraparound of the dimension has been crossed, upper half before. Ring and dimension order torus.
	Halves,
	///First third always. Then the second third once the wraparound has been crossed or the last third before. Adaptive torus routings.
	Thirds,
}

impl Quantifiable for VirtualChannelPartition
{
	fn total_memory(&self) -> usize
	{
		size_of::<Self>()
	}
	fn print_memory_breakdown(&self)
	{
		unimplemented!();
	}
	fn forecast_total_memory(&self) -> usize
	{
		size_of::<Self>()
	}
}

///What decides the eligible virtual channels for a packet.
#[derive(Clone,Copy,Debug)]
pub struct SelectionContext<'a>
{
	pub partition: VirtualChannelPartition,
	///The checkpoints of the packet, indexed by dimension.
	pub checkpoints: &'a [bool],
}

impl<'a> SelectionContext<'a>
{
	///A context in which the whole pool is eligible.
	pub fn whole() -> SelectionContext<'static>
	{
		SelectionContext{
			partition: VirtualChannelPartition::Whole,
			checkpoints: &[],
		}
	}
	fn checkpoint(&self, dimension:usize) -> bool
	{
		self.checkpoints.get(dimension).copied().unwrap_or(false)
	}
}

///The eligible channel indices of `vnet`, as up to two ranges scanned in order.
///Ports without dimension, as the local one, always expose the whole pool.
pub fn eligible_ranges(context:&SelectionContext, dimension:Option<usize>, vnet:usize, virtual_channels_per_vnet:usize) -> (Range<usize>,Range<usize>)
{
	let size = virtual_channels_per_vnet;
	let base = vnet*size;
	let dimension = match dimension
	{
		None => return (base..base+size,0..0),
		Some(dimension) => dimension,
	};
	match context.partition
	{
		VirtualChannelPartition::Whole => (base..base+size,0..0),
		VirtualChannelPartition::Halves =>
		{
			let half = size/2;
			if context.checkpoint(dimension)
			{
				(base..base+half,0..0)
			}
			else
			{
				(base+half..base+size,0..0)
			}
		},
		VirtualChannelPartition::Thirds =>
		{
			let third = size/3;
			let second = if context.checkpoint(dimension)
			{
				base+third..base+2*third
			}
			else
			{
				base+2*third..base+size
			};
			(base..base+third,second)
		},
	}
}

///An egress port of a router.
#[derive(Quantifiable)]
pub struct OutputPort
{
	index: usize,
	direction: PortDirection,
	///Topological dimension of `direction`, `None` for the local port.
	dimension: Option<usize>,
	virtual_channels_per_vnet: usize,
	///All the channels of the port, `virtual_networks*virtual_channels_per_vnet` of them.
	virtual_channels: Vec<VirtualChannel>,
	///Flits waiting for the link.
	egress: Buffer,
	///Credits on their way back from the next router.
	credit_link: CreditLink,
	statistics_forwarded_flits: usize,
	statistics_received_credits: usize,
	statistics_free_signals: usize,
}

impl OutputPort
{
	pub fn new(index:usize, direction:PortDirection, virtual_networks:usize, virtual_channels_per_vnet:usize, buffer_depth:usize) -> OutputPort
	{
		let total = virtual_networks*virtual_channels_per_vnet;
		OutputPort{
			index,
			direction,
			dimension: direction.dimension(),
			virtual_channels_per_vnet,
			virtual_channels: (0..total).map(|vc|VirtualChannel::new(vc,buffer_depth)).collect(),
			egress: Buffer::new(),
			credit_link: CreditLink::new(),
			statistics_forwarded_flits: 0,
			statistics_received_credits: 0,
			statistics_free_signals: 0,
		}
	}
	pub fn index(&self) -> usize
	{
		self.index
	}
	pub fn direction(&self) -> PortDirection
	{
		self.direction
	}
	pub fn dimension(&self) -> Option<usize>
	{
		self.dimension
	}
	pub fn num_virtual_channels(&self) -> usize
	{
		self.virtual_channels.len()
	}
	pub fn virtual_channels_per_vnet(&self) -> usize
	{
		self.virtual_channels_per_vnet
	}
	pub fn decrement_credit(&mut self, vc:usize)
	{
		self.virtual_channels[vc].decrement_credit();
	}
	pub fn increment_credit(&mut self, vc:usize)
	{
		self.virtual_channels[vc].increment_credit();
	}
	pub fn has_credit(&self, vc:usize) -> bool
	{
		self.virtual_channels[vc].has_credit()
	}
	pub fn is_vc_idle(&self, vc:usize) -> bool
	{
		self.virtual_channels[vc].is_idle()
	}
	pub fn set_vc_state(&mut self, vc:usize, state:VirtualChannelState)
	{
		self.virtual_channels[vc].set_state(state);
	}
	pub fn vc_state(&self, vc:usize) -> VirtualChannelState
	{
		self.virtual_channels[vc].state()
	}
	pub fn credit_count(&self, vc:usize) -> usize
	{
		self.virtual_channels[vc].credit_count()
	}
	fn eligible(&self, vnet:usize, context:&SelectionContext) -> impl Iterator<Item=usize>
	{
		let (first,second) = eligible_ranges(context,self.dimension,vnet,self.virtual_channels_per_vnet);
		first.chain(second)
	}
	///Take the first idle eligible channel of `vnet`, in increasing index. It becomes `Active`.
	pub fn select_free_vc(&mut self, vnet:usize, context:&SelectionContext) -> Option<usize>
	{
		let found = self.eligible(vnet,context).find(|&vc|self.virtual_channels[vc].is_idle());
		if let Some(vc) = found
		{
			self.virtual_channels[vc].set_state(VirtualChannelState::Active);
			trace!("outport {} ({}) assigns virtual channel {} in vnet {}",self.index,self.direction,vc,vnet);
		}
		found
	}
	///The number of idle eligible channels of `vnet`. Changes nothing.
	pub fn count_free_vc(&self, vnet:usize, context:&SelectionContext) -> usize
	{
		self.eligible(vnet,context).filter(|&vc|self.virtual_channels[vc].is_idle()).count()
	}
	pub fn has_free_vc(&self, vnet:usize, context:&SelectionContext) -> bool
	{
		self.eligible(vnet,context).any(|vc|self.virtual_channels[vc].is_idle())
	}
	///Apply a credit coming from the next router. A free signal releases the channel whatever its count.
	pub fn on_credit_message(&mut self, message:&CreditMessage)
	{
		self.statistics_received_credits+=1;
		self.increment_credit(message.virtual_channel);
		if message.is_free_signal
		{
			self.statistics_free_signals+=1;
			self.set_vc_state(message.virtual_channel,VirtualChannelState::Idle);
		}
	}
	///Put a credit on the link back to this port, arriving `delay` cycles after `cycle`.
	///Returns the wakeup that will take it.
	pub fn deliver_credit(&mut self, message:CreditMessage, cycle:Time, delay:usize) -> EventGeneration
	{
		self.credit_link.send(message,cycle+delay as Time);
		EventGeneration{
			delay,
			position: CyclePosition::Begin,
			event: Event::CreditWakeup{port:self.index},
		}
	}
	///Take one ready credit, if any. When more credits are ready another wakeup is requested for the next cycle.
	pub fn wakeup(&mut self, cycle:Time) -> Vec<EventGeneration>
	{
		let mut events = vec![];
		if let Some(message) = self.credit_link.consume(cycle)
		{
			debug!("outport {} takes credit {:?} at cycle {}",self.index,message,cycle);
			self.on_credit_message(&message);
			if self.credit_link.is_ready(cycle)
			{
				events.push(EventGeneration{
					delay: 1,
					position: CyclePosition::Begin,
					event: Event::CreditWakeup{port:self.index},
				});
			}
		}
		events
	}
	///Queue a flit for the link, which will carry it next cycle.
	pub fn insert_flit(&mut self, flit:Rc<Flit>) -> EventGeneration
	{
		self.egress.push(flit);
		self.statistics_forwarded_flits+=1;
		EventGeneration{
			delay: 1,
			position: CyclePosition::End,
			event: Event::LinkTraversal{port:self.index},
		}
	}
	///The queue of flits waiting for the link.
	pub fn out_queue(&mut self) -> &mut Buffer
	{
		&mut self.egress
	}
	pub fn credit_link(&self) -> &CreditLink
	{
		&self.credit_link
	}
	///The data of the first queued flit whose message has `address`.
	pub fn functional_read(&self, address:u64) -> Option<Vec<u8>>
	{
		self.egress.iter().find(|flit|flit.address()==Some(address)).map(|flit|flit.packet.message.data.borrow().clone())
	}
	///Overwrite the data of every queued flit whose message has `address`. Returns how many flits matched.
	pub fn functional_write(&mut self, address:u64, data:&[u8]) -> usize
	{
		let mut written = 0;
		for flit in self.egress.iter()
		{
			if flit.address()==Some(address)
			{
				*flit.packet.message.data.borrow_mut() = data.to_vec();
				written+=1;
			}
		}
		written
	}
	pub fn statistics_forwarded_flits(&self) -> usize
	{
		self.statistics_forwarded_flits
	}
	pub fn statistics_received_credits(&self) -> usize
	{
		self.statistics_received_credits
	}
	pub fn statistics_free_signals(&self) -> usize
	{
		self.statistics_free_signals
	}
	pub fn reset_statistics(&mut self)
	{
		self.statistics_forwarded_flits=0;
		self.statistics_received_credits=0;
		self.statistics_free_signals=0;
	}
}
