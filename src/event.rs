use std::mem::{size_of};
use crate::quantify::Quantifiable;
use quantifiable_derive::Quantifiable;//the derive macro

///The logical clock of the network. One unit per router cycle.
pub type Time = u64;

///The events a router asks to be scheduled. They are addressed to the output port with index `port`.
#[derive(Clone,Debug,PartialEq,Eq)]
pub enum Event
{
	///The port should take a ready credit from its credit link.
	CreditWakeup{
		port: usize,
	},
	///The link attached to the port should move the flit at the front of its egress queue.
	LinkTraversal{
		port: usize,
	},
}

impl Quantifiable for Event
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

impl Event
{
	pub fn port(&self) -> usize
	{
		match self
		{
			&Event::CreditWakeup{port} => port,
			&Event::LinkTraversal{port} => port,
		}
	}
}

///This is used to sort the processing of the events inside a cycle.
///If some event occurs at Begin then its result will be visible for events at End.
///Currently at Begin: credit wakeups, so the counters are updated before any allocation.
///Currently at End: link traversals.
#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub enum CyclePosition
{
	Begin,
	End,
}

///Encapsulates a request for insertion on the event queue.
#[derive(Clone,Debug,PartialEq)]
pub struct EventGeneration
{
	///To insert the event after `delay` cycles.
	pub delay: usize,
	///Whether the event should be processed at the begin or the end of its cycle.
	pub position: CyclePosition,
	///The actual event to be inserted.
	pub event: Event,
}

///The event queue structure managing the insertion and extraction of events.
#[derive(Quantifiable)]
pub struct EventQueue
{
	event_begin_circle: Vec<Vec<Event>>,//Events to be processed at the beginning of a cycle (credit wakeups)
	event_end_circle: Vec<Vec<Event>>,//Events to be processed at the end of a cycle (link traversals)
	current: usize,
	cycle: Time,
}

impl EventQueue
{
	///Creates a new EventQueue. `size` should be greater than any possible delay.
	pub fn new (size:usize) -> EventQueue
	{
		EventQueue{
			event_begin_circle: vec![ vec![] ; size ],
			event_end_circle: vec![ vec![] ; size ],
			current:0,
			cycle:0,
		}
	}
	///The cycle whose events are currently accessible.
	pub fn cycle(&self) -> Time
	{
		self.cycle
	}
	///Advances the queue by a cycle. This drops the events in the finished cycle.
	pub fn advance(&mut self)
	{
		//Better to drop the old Vec; otherwise their capcity is covering a lot of memory.
		self.event_begin_circle[self.current]=Vec::new();
		self.event_end_circle[self.current]=Vec::new();
		self.current=(self.current+1)%self.event_begin_circle.len();
		self.cycle+=1;
	}
	///Access to the event in the `ievent` index of the events to be executed at the begin of the cycle.
	pub fn access_begin(&self, ievent:usize) -> Option<&Event>
	{
		self.event_begin_circle[self.current].get(ievent)
	}
	///Access to the event in the `ievent` index of the events to be executed at the end of the cycle.
	pub fn access_end(&self, ievent:usize) -> Option<&Event>
	{
		self.event_end_circle[self.current].get(ievent)
	}
	///Adds an event to the list of events to be executed at the begin of the cycle `current_cycle + delay`.
	pub fn enqueue_begin(&mut self, event:Event, delay: usize)
	{
		if delay>=self.event_begin_circle.len()
		{
			panic!("Delay too long");
		}
		let position=(self.current+delay)%self.event_begin_circle.len();
		self.event_begin_circle[position].push(event);
	}
	///Adds an event to the list of events to be executed at the end of the cycle `current_cycle + delay`.
	pub fn enqueue_end(&mut self, event:Event, delay: usize)
	{
		if delay>=self.event_end_circle.len()
		{
			panic!("Delay too long");
		}
		let position=(self.current+delay)%self.event_end_circle.len();
		self.event_end_circle[position].push(event);
	}
	///Adds an event as it requests.
	pub fn enqueue(&mut self, event_generation:EventGeneration)
	{
		match event_generation.position
		{
			CyclePosition::Begin => self.enqueue_begin(event_generation.event,event_generation.delay),
			CyclePosition::End => self.enqueue_end(event_generation.event,event_generation.delay),
		};
	}
	///Whether there is no event pending in any cycle.
	pub fn is_empty(&self) -> bool
	{
		self.event_begin_circle.iter().all(|v|v.is_empty()) && self.event_end_circle.iter().all(|v|v.is_empty())
	}
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn events_wait_their_delay()
	{
		let mut queue=EventQueue::new(4);
		queue.enqueue(EventGeneration{delay:1,position:CyclePosition::Begin,event:Event::CreditWakeup{port:2}});
		queue.enqueue(EventGeneration{delay:0,position:CyclePosition::End,event:Event::LinkTraversal{port:1}});
		assert_eq!(queue.access_begin(0),None);
		assert_eq!(queue.access_end(0),Some(&Event::LinkTraversal{port:1}));
		queue.advance();
		assert_eq!(queue.cycle(),1);
		assert_eq!(queue.access_begin(0).map(|e|e.port()),Some(2));
		assert_eq!(queue.access_end(0),None);
		queue.advance();
		assert!(queue.is_empty());
	}

	#[test]
	#[should_panic(expected="Delay too long")]
	fn delay_beyond_the_circle()
	{
		let mut queue=EventQueue::new(2);
		queue.enqueue_begin(Event::CreditWakeup{port:0},2);
	}
}
