
use std::mem::{size_of};
use log::{debug,warn};
use quantifiable_derive::Quantifiable;//the derive macro
use crate::quantify::Quantifiable;

///Occupancy of a virtual channel. A packet owns the channel while it is `Active`.
#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub enum VirtualChannelState
{
	Idle,
	Active,
}

impl Quantifiable for VirtualChannelState
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

///The view an output port has of one virtual channel of the next router.
///`credit_count` is the number of free slots known in its buffer, always in `[0,buffer_depth]`.
#[derive(Clone,Debug,Quantifiable)]
pub struct VirtualChannel
{
	index: usize,
	credit_count: usize,
	buffer_depth: usize,
	state: VirtualChannelState,
}

impl VirtualChannel
{
	///An idle channel with its whole buffer available.
	pub fn new(index:usize, buffer_depth:usize) -> VirtualChannel
	{
		VirtualChannel{
			index,
			credit_count: buffer_depth,
			buffer_depth,
			state: VirtualChannelState::Idle,
		}
	}
	pub fn index(&self) -> usize
	{
		self.index
	}
	pub fn credit_count(&self) -> usize
	{
		self.credit_count
	}
	pub fn buffer_depth(&self) -> usize
	{
		self.buffer_depth
	}
	pub fn state(&self) -> VirtualChannelState
	{
		self.state
	}
	///A flit has been sent to the channel. Sending without credits breaks the protocol.
	pub fn decrement_credit(&mut self)
	{
		if self.credit_count==0
		{
			panic!("virtual channel {} has no credit to consume",self.index);
		}
		self.credit_count-=1;
		debug!("virtual channel {} credits decremented to {}",self.index,self.credit_count);
	}
	///A credit has returned. Saturates at the buffer depth.
	pub fn increment_credit(&mut self)
	{
		if self.credit_count>=self.buffer_depth
		{
			warn!("virtual channel {} received a credit while holding all its {} credits",self.index,self.buffer_depth);
			return;
		}
		self.credit_count+=1;
		debug!("virtual channel {} credits incremented to {}",self.index,self.credit_count);
	}
	///Whether a flit may be sent now. Only asked for a channel held by a packet.
	pub fn has_credit(&self) -> bool
	{
		assert!(self.state==VirtualChannelState::Active,"credit queried on virtual channel {} which is {:?}",self.index,self.state);
		self.credit_count>0
	}
	pub fn is_idle(&self) -> bool
	{
		self.state==VirtualChannelState::Idle
	}
	pub fn set_state(&mut self, state:VirtualChannelState)
	{
		if self.state!=state
		{
			debug!("virtual channel {} goes from {:?} to {:?}",self.index,self.state,state);
		}
		self.state=state;
	}
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn credits_stay_in_range()
	{
		let mut vc=VirtualChannel::new(3,2);
		assert!(vc.is_idle());
		vc.set_state(VirtualChannelState::Active);
		vc.decrement_credit();
		vc.decrement_credit();
		assert!(!vc.has_credit());
		vc.increment_credit();
		vc.increment_credit();
		vc.increment_credit();
		assert_eq!(vc.credit_count(),2);
		assert!(vc.has_credit());
	}

	#[test]
	#[should_panic(expected="no credit")]
	fn underflow_is_fatal()
	{
		let mut vc=VirtualChannel::new(0,1);
		vc.decrement_credit();
		vc.decrement_credit();
	}

	#[test]
	#[should_panic(expected="credit queried")]
	fn credit_query_on_idle_channel()
	{
		let vc=VirtualChannel::new(0,4);
		vc.has_credit();
	}
}
