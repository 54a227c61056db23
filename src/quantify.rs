use std::mem::{size_of,size_of_val};
use std::collections::{VecDeque,BTreeMap,BTreeSet};
use std::rc::Rc;
use std::cell::RefCell;

// The derive macro `quantifiable_derive::Quantifiable` expands into paths to `crate::quantify::Quantifiable`, so this module must stay at the crate root.

pub trait Quantifiable
{
	/// Get the total memory currently being employed by the implementing type. Both stack and heap.
	fn total_memory(&self) -> usize;
	/// Prints by stdout how much memory is used per component.
	fn print_memory_breakdown(&self);
	/// Get an estimation on how much memory the type could reach during the simulation.
	fn forecast_total_memory(&self) -> usize;
}

///Implement `Quantifiable` for a type whose memory is given by an expression on `self`.
///Only the types reached by the router state are covered; the forecast is the current usage.
macro_rules! quantifiable_by
{
	( [$($generics:tt)*] $t:ty, $this:ident => $amount:expr ) =>
	{
		impl<$($generics)*> Quantifiable for $t
		{
			fn total_memory(&self) -> usize
			{
				let $this = self;
				$amount
			}
			fn print_memory_breakdown(&self)
			{
				unimplemented!();
			}
			fn forecast_total_memory(&self) -> usize
			{
				self.total_memory()
			}
		}
	}
}

quantifiable_by!([] bool, _this => size_of::<bool>());
quantifiable_by!([] u8, _this => size_of::<u8>());
quantifiable_by!([] u64, _this => size_of::<u64>());
quantifiable_by!([] usize, _this => size_of::<usize>());

//Flits, credit messages and the routing table store their elements inline.
quantifiable_by!([T:Quantifiable] Vec<T>, this =>
	size_of::<Vec<T>>() + this.iter().map(|e|e.total_memory()).sum::<usize>() + (this.capacity()-this.len())*size_of::<T>());
quantifiable_by!([T:Quantifiable] VecDeque<T>, this =>
	size_of::<VecDeque<T>>() + this.iter().map(|e|e.total_memory()).sum::<usize>() + (this.capacity()-this.len())*size_of::<T>());
quantifiable_by!([A:Quantifiable, B:Quantifiable] (A,B), this => this.0.total_memory()+this.1.total_memory());
//Direction maps and destination sets. Nodes are not accounted.
quantifiable_by!([A:Quantifiable, B:Quantifiable] BTreeMap<A,B>, this => size_of::<BTreeMap<A,B>>() + this.len()*(size_of::<A>()+size_of::<B>()));
quantifiable_by!([A:Quantifiable] BTreeSet<A>, this => size_of::<BTreeSet<A>>() + this.len()*size_of::<A>());
//Packets and messages are shared between flits; their owner is not known here.
quantifiable_by!([T:?Sized] Rc<T>, _this => size_of::<Rc<T>>());
quantifiable_by!([T:Quantifiable+?Sized] Box<T>, this => size_of::<Box<T>>() + this.as_ref().total_memory());
quantifiable_by!([T:Quantifiable] Option<T>, this => match this
	{
		None => size_of::<Option<T>>(),
		Some(thing) => thing.total_memory(),
	});
quantifiable_by!([T:Quantifiable+?Sized] RefCell<T>, this => this.borrow().total_memory() + size_of_val(this));

pub fn human_bytes(byte_amount:usize) -> String
{
	if byte_amount<3000
	{
		return format!("{} bytes",byte_amount);
	}
	let kb_amount=byte_amount as f64 / 1024.;
	if kb_amount<3000f64
	{
		return format!("{} KB",kb_amount);
	}
	let mb_amount=kb_amount / 1024.;
	return format!("{} MB",mb_amount);
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn vectors_count_their_elements()
	{
		let empty:Vec<u64>=Vec::with_capacity(0);
		let full:Vec<u64>=vec![1,2,3,4];
		assert_eq!(full.total_memory()-empty.total_memory(),4*size_of::<u64>());
		assert_eq!(full.forecast_total_memory(),full.total_memory());
		assert_eq!(human_bytes(100),"100 bytes");
	}

	#[test]
	fn router_containers_are_counted()
	{
		let mut pending:VecDeque<(u64,usize)>=VecDeque::new();
		pending.push_back((3,1));
		pending.push_back((4,0));
		assert_eq!(pending.total_memory(),size_of::<VecDeque<(u64,usize)>>()+pending.capacity()*size_of::<(u64,usize)>());
		let set:BTreeSet<usize>=vec![1,2,3].into_iter().collect();
		assert_eq!(set.total_memory(),size_of::<BTreeSet<usize>>()+3*size_of::<usize>());
		let mut map=BTreeMap::new();
		map.insert(2usize,true);
		assert_eq!(map.total_memory(),size_of::<BTreeMap<usize,bool>>()+size_of::<usize>()+size_of::<bool>());
		let cell=RefCell::new(vec![0u8;5]);
		assert!(cell.total_memory()>=size_of::<Vec<u8>>()+5);
		assert_eq!(Some(7usize).total_memory(),size_of::<usize>());
		assert_eq!(Box::new(9u64).total_memory(),size_of::<Box<u64>>()+size_of::<u64>());
	}
}
