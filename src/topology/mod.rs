pub mod cartesian;

use std::collections::BTreeMap;
use std::fmt::{Display,Formatter};
use std::mem::{size_of};
use quantifiable_derive::Quantifiable;//the derive macro
use crate::error::Error;
use crate::quantify::Quantifiable;
use crate::error;

///The side of a dimension toward which a link goes.
///`Positive` increments the coordinate (East, North, `dimK_pos`) and `Negative` decrements it.
#[derive(Clone,Copy,Debug,PartialEq,Eq,PartialOrd,Ord,Hash)]
pub enum Sign
{
	Negative,
	Positive,
}

impl Sign
{
	pub fn opposite(self) -> Sign
	{
		match self
		{
			Sign::Negative => Sign::Positive,
			Sign::Positive => Sign::Negative,
		}
	}
}

impl Quantifiable for Sign
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

///The two axes of a mesh. `X` is resolved before `Y` in XY routing.
#[derive(Clone,Copy,Debug,PartialEq,Eq,PartialOrd,Ord,Hash)]
pub enum MeshAxis
{
	X,
	Y,
}

///The family of ports a router has, which decides how the labels `East` and `West` are read.
#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub enum PortFamily
{
	///Local ports plus mesh (`East`, `West`, `North`, `South`) or torus (`dimK_pos`, `dimK_neg`) labels.
	Cartesian,
	///Local ports plus the two sides of a ring, labelled `East` and `West`.
	Ring,
}

///Descriptor of the direction an input or output port faces.
///It is built once from the label given in the configuration.
#[derive(Clone,Copy,Debug,PartialEq,Eq,PartialOrd,Ord,Hash)]
pub enum PortDirection
{
	///The port toward the network interfaces of this router.
	Local,
	Mesh{
		axis: MeshAxis,
		sign: Sign,
	},
	Ring{
		sign: Sign,
	},
	TorusDimension{
		index: usize,
		sign: Sign,
	},
}

impl PortDirection
{
	///Builds the descriptor of a label such as `Local`, `North` or `dim2_neg`.
	pub fn from_label(label:&str, family:PortFamily) -> Result<PortDirection,Error>
	{
		let direction = match (label,family)
		{
			("Local",_) => PortDirection::Local,
			("East",PortFamily::Ring) => PortDirection::Ring{sign:Sign::Positive},
			("West",PortFamily::Ring) => PortDirection::Ring{sign:Sign::Negative},
			("East",PortFamily::Cartesian) => PortDirection::Mesh{axis:MeshAxis::X,sign:Sign::Positive},
			("West",PortFamily::Cartesian) => PortDirection::Mesh{axis:MeshAxis::X,sign:Sign::Negative},
			("North",PortFamily::Cartesian) => PortDirection::Mesh{axis:MeshAxis::Y,sign:Sign::Positive},
			("South",PortFamily::Cartesian) => PortDirection::Mesh{axis:MeshAxis::Y,sign:Sign::Negative},
			(_,PortFamily::Cartesian) =>
			{
				//dim{index}_{pos|neg}
				let rest = label.strip_prefix("dim").ok_or_else(||error!(unknown_direction_label,label.to_string()))?;
				let (index,side) = match rest.find('_')
				{
					Some(position) => (&rest[..position],&rest[position+1..]),
					None => return Err(error!(unknown_direction_label,label.to_string())),
				};
				let index:usize = index.parse().map_err(|_|error!(unknown_direction_label,label.to_string()))?;
				let sign = match side
				{
					"pos" => Sign::Positive,
					"neg" => Sign::Negative,
					_ => return Err(error!(unknown_direction_label,label.to_string())),
				};
				PortDirection::TorusDimension{index,sign}
			},
			_ => return Err(error!(unknown_direction_label,label.to_string())),
		};
		Ok(direction)
	}
	///The label that `from_label` reads back into this same descriptor.
	pub fn label(&self) -> String
	{
		match self
		{
			PortDirection::Local => "Local".to_string(),
			PortDirection::Mesh{axis:MeshAxis::X,sign:Sign::Positive} => "East".to_string(),
			PortDirection::Mesh{axis:MeshAxis::X,sign:Sign::Negative} => "West".to_string(),
			PortDirection::Mesh{axis:MeshAxis::Y,sign:Sign::Positive} => "North".to_string(),
			PortDirection::Mesh{axis:MeshAxis::Y,sign:Sign::Negative} => "South".to_string(),
			PortDirection::Ring{sign:Sign::Positive} => "East".to_string(),
			PortDirection::Ring{sign:Sign::Negative} => "West".to_string(),
			PortDirection::TorusDimension{index,sign:Sign::Positive} => format!("dim{}_pos",index),
			PortDirection::TorusDimension{index,sign:Sign::Negative} => format!("dim{}_neg",index),
		}
	}
	///The topological dimension of the port, `None` for the local port.
	pub fn dimension(&self) -> Option<usize>
	{
		match self
		{
			PortDirection::Local => None,
			PortDirection::Mesh{axis:MeshAxis::X,..} => Some(0),
			PortDirection::Mesh{axis:MeshAxis::Y,..} => Some(1),
			PortDirection::Ring{..} => Some(0),
			PortDirection::TorusDimension{index,..} => Some(*index),
		}
	}
	pub fn sign(&self) -> Option<Sign>
	{
		match self
		{
			PortDirection::Local => None,
			PortDirection::Mesh{sign,..} => Some(*sign),
			PortDirection::Ring{sign} => Some(*sign),
			PortDirection::TorusDimension{sign,..} => Some(*sign),
		}
	}
}

impl Display for PortDirection
{
	fn fmt(&self, formatter: &mut Formatter<'_>) -> std::result::Result<(), std::fmt::Error>
	{
		write!(formatter,"{}",self.label())
	}
}

impl Quantifiable for PortDirection
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

///Both-way association between the directions of a router and its port indices.
///Several ports may share the `Local` direction; `index_of` gives the last one registered.
#[derive(Clone,Debug,Default,Quantifiable)]
pub struct DirectionMap
{
	direction_to_index: BTreeMap<PortDirection,usize>,
	index_to_direction: BTreeMap<usize,PortDirection>,
}

impl DirectionMap
{
	pub fn new() -> DirectionMap
	{
		DirectionMap::default()
	}
	pub fn insert(&mut self, direction:PortDirection, index:usize)
	{
		self.direction_to_index.insert(direction,index);
		self.index_to_direction.insert(index,direction);
	}
	pub fn index_of(&self, direction:&PortDirection) -> Option<usize>
	{
		self.direction_to_index.get(direction).copied()
	}
	pub fn direction_of(&self, index:usize) -> Option<PortDirection>
	{
		self.index_to_direction.get(&index).copied()
	}
	///Number of registered ports.
	pub fn len(&self) -> usize
	{
		self.index_to_direction.len()
	}
	pub fn is_empty(&self) -> bool
	{
		self.index_to_direction.is_empty()
	}
}
