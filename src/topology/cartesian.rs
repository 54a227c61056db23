
use quantifiable_derive::Quantifiable;//the derive macro
use crate::topology::{Sign,MeshAxis};

///A Cartesian ortahedral region of arbitrary dimension.
///Router indices are decomposed in mixed radix with the first side varying fastest.
#[derive(Quantifiable)]
#[derive(Clone,Debug,PartialEq)]
pub struct CartesianData
{
	pub sides: Vec<usize>,
	pub size: usize,
}

impl CartesianData
{
	pub fn new(sides:&Vec<usize>) -> CartesianData
	{
		CartesianData{
			sides:sides.clone(),
			size: sides.iter().product(),
		}
	}
	pub fn unpack(&self, mut router_index: usize) -> Vec<usize>
	{
		let mut r=Vec::with_capacity(self.sides.len());
		for side in self.sides.iter()
		{
			r.push(router_index%side);
			router_index/=side;
		}
		r
	}
	pub fn pack(&self, coordinates:&Vec<usize>) -> usize
	{
		let mut r=0;
		let mut stride=1;
		for (i,side) in self.sides.iter().enumerate()
		{
			r+=coordinates[i]*stride;
			stride*=side;
		}
		r
	}
	pub fn dimensions(&self) -> usize
	{
		self.sides.len()
	}
	///Hops needed to go from coordinate `from` to coordinate `to` of `dimension` moving only in the positive direction.
	pub fn positive_offset(&self, dimension:usize, from:usize, to:usize) -> usize
	{
		let side=self.sides[dimension];
		(to + side - from) % side
	}
	///Whether leaving coordinate `coordinate` of `dimension` toward `sign` uses the wraparound link.
	pub fn crosses_wraparound(&self, dimension:usize, coordinate:usize, sign:Sign) -> bool
	{
		match sign
		{
			Sign::Negative => coordinate==0,
			Sign::Positive => coordinate+1==self.sides[dimension],
		}
	}
}

///The direction of the shorter arc for a positive offset in a ring of `side` elements.
///An offset of exactly half the side goes `Positive`. A null offset has no direction.
pub fn shorter_arc(positive_offset:usize, side:usize) -> Option<Sign>
{
	if positive_offset==0
	{
		None
	}
	else if 2*positive_offset<=side
	{
		Some(Sign::Positive)
	}
	else
	{
		Some(Sign::Negative)
	}
}

///Whether going toward `sign` is among the shortest ways to cover `positive_offset`. At exactly half the side both are.
pub fn is_minimal_sign(positive_offset:usize, side:usize, sign:Sign) -> bool
{
	match sign
	{
		Sign::Positive => 2*positive_offset<=side,
		Sign::Negative => 2*positive_offset>=side,
	}
}

///Probability of going in the positive direction to cover `positive_offset`: `1 - offset/side`.
///It is 1 for a null offset and decreases linearly with the offset.
pub fn positive_probability(positive_offset:usize, side:usize) -> f64
{
	1.0 - (positive_offset as f64) / (side as f64)
}

///Direction of the ring shortest arc. Distances of at least half the ring go `Negative` (West), the rest `Positive` (East).
///Returns `None` when `current==target`.
pub fn ring_direction(current:usize, target:usize, size:usize) -> Option<Sign>
{
	let hops = (target + size - current) % size;
	if hops==0
	{
		None
	}
	else if hops >= size/2
	{
		Some(Sign::Negative)
	}
	else
	{
		Some(Sign::Positive)
	}
}

///XY dimension order in a mesh whose routers are numbered by rows of `columns` routers.
///The X offset is fully resolved before the Y offset. Returns `None` when `current==target`.
pub fn xy_direction(current:usize, target:usize, columns:usize) -> Option<(MeshAxis,Sign)>
{
	let (current_x,current_y) = (current%columns, current/columns);
	let (target_x,target_y) = (target%columns, target/columns);
	if target_x!=current_x
	{
		let sign = if target_x>current_x { Sign::Positive } else { Sign::Negative };
		Some((MeshAxis::X,sign))
	}
	else if target_y!=current_y
	{
		let sign = if target_y>current_y { Sign::Positive } else { Sign::Negative };
		Some((MeshAxis::Y,sign))
	}
	else
	{
		None
	}
}

///Dimension order in a torus: the first dimension with a nonzero offset, going by its shorter arc.
pub fn dimension_order_direction(torus:&CartesianData, current:&[usize], target:&[usize]) -> Option<(usize,Sign)>
{
	for dimension in 0..torus.dimensions()
	{
		let offset = torus.positive_offset(dimension,current[dimension],target[dimension]);
		if let Some(sign) = shorter_arc(offset,torus.sides[dimension])
		{
			return Some((dimension,sign));
		}
	}
	None
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn pack_unpack_first_side_fastest()
	{
		let data=CartesianData::new(&vec![4,3,2]);
		assert_eq!(data.size,24);
		assert_eq!(data.unpack(5),vec![1,1,0]);
		assert_eq!(data.unpack(23),vec![3,2,1]);
		for index in 0..data.size
		{
			assert_eq!(data.pack(&data.unpack(index)),index);
		}
	}

	#[test]
	fn shorter_arc_ties_go_positive()
	{
		assert_eq!(shorter_arc(0,4),None);
		assert_eq!(shorter_arc(1,4),Some(Sign::Positive));
		assert_eq!(shorter_arc(2,4),Some(Sign::Positive));
		assert_eq!(shorter_arc(3,4),Some(Sign::Negative));
		assert!(is_minimal_sign(2,4,Sign::Negative));
		assert!(!is_minimal_sign(3,4,Sign::Positive));
		assert_eq!(positive_probability(3,4),0.25);
	}

	#[test]
	fn ring_directions()
	{
		assert_eq!(ring_direction(0,5,8),Some(Sign::Negative));
		assert_eq!(ring_direction(0,3,8),Some(Sign::Positive));
		assert_eq!(ring_direction(0,4,8),Some(Sign::Negative));
		assert_eq!(ring_direction(6,1,8),Some(Sign::Positive));
		assert_eq!(ring_direction(2,2,8),None);
	}

	#[test]
	fn xy_resolves_x_first()
	{
		assert_eq!(xy_direction(0,15,4),Some((MeshAxis::X,Sign::Positive)));
		assert_eq!(xy_direction(3,12,4),Some((MeshAxis::X,Sign::Negative)));
		assert_eq!(xy_direction(3,15,4),Some((MeshAxis::Y,Sign::Positive)));
		assert_eq!(xy_direction(13,1,4),Some((MeshAxis::Y,Sign::Negative)));
		assert_eq!(xy_direction(7,7,4),None);
	}

	#[test]
	fn torus_dimension_order()
	{
		let torus=CartesianData::new(&vec![4,4]);
		let origin=torus.unpack(0);
		assert_eq!(dimension_order_direction(&torus,&origin,&torus.unpack(3)),Some((0,Sign::Negative)));
		assert_eq!(dimension_order_direction(&torus,&origin,&torus.unpack(2)),Some((0,Sign::Positive)));
		assert_eq!(dimension_order_direction(&torus,&origin,&torus.unpack(4)),Some((1,Sign::Positive)));
		assert_eq!(dimension_order_direction(&torus,&origin,&origin),None);
		assert!(torus.crosses_wraparound(0,0,Sign::Negative));
		assert!(torus.crosses_wraparound(1,3,Sign::Positive));
		assert!(!torus.crosses_wraparound(1,2,Sign::Positive));
	}
}
