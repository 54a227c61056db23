/*!

Route computation of a router.

A [RouteComputation] owns the static [RoutingTable] of the router, the maps between port directions and port indices, and one [Routing] algorithm. When a packet reaches the head of an input port the allocator calls [RouteComputation::outport_compute], which returns the index of the output port the packet must take. Packets for the current router always use the table; the rest are handed to the routing algorithm.

The per-packet state the algorithms need travels in the [RouteInfo] of the packet. The direction vector of the adaptive torus algorithms is filled at the first hop and only read afterwards, and the checkpoint flags are set by [RouteComputation::next_hop_route_info] when a hop crosses a wraparound link.

*/

use std::collections::BTreeSet;
use std::fmt::Debug;
use std::mem::{size_of};
use ::rand::{Rng,rngs::StdRng};
use log::trace;
use quantifiable_derive::Quantifiable;//the derive macro
use crate::config_parser::ConfigurationValue;
use crate::error::Error;
use crate::quantify::Quantifiable;
use crate::router::output_port::{OutputPort,SelectionContext,VirtualChannelPartition};
use crate::topology::{DirectionMap,PortDirection,PortFamily,Sign,MeshAxis};
use crate::topology::cartesian::{self,CartesianData};
use crate::{error,match_object};

///Set of endpoints a packet is addressed to. A routing table entry is also a set of endpoints: those reachable by its port.
#[derive(Clone,Debug,Default,PartialEq,Eq,Quantifiable)]
pub struct DestinationSet
{
	endpoints: BTreeSet<usize>,
}

impl DestinationSet
{
	pub fn new() -> DestinationSet
	{
		DestinationSet::default()
	}
	pub fn single(endpoint:usize) -> DestinationSet
	{
		let mut set=DestinationSet::new();
		set.insert(endpoint);
		set
	}
	pub fn insert(&mut self, endpoint:usize)
	{
		self.endpoints.insert(endpoint);
	}
	pub fn contains(&self, endpoint:usize) -> bool
	{
		self.endpoints.contains(&endpoint)
	}
	pub fn intersects(&self, other:&DestinationSet) -> bool
	{
		self.endpoints.intersection(&other.endpoints).next().is_some()
	}
	pub fn iter(&self) -> impl Iterator<Item=usize> + '_
	{
		self.endpoints.iter().copied()
	}
	pub fn is_empty(&self) -> bool
	{
		self.endpoints.is_empty()
	}
}

impl std::iter::FromIterator<usize> for DestinationSet
{
	fn from_iter<I:IntoIterator<Item=usize>>(iter:I) -> DestinationSet
	{
		DestinationSet{ endpoints: iter.into_iter().collect() }
	}
}

///Information carried by a packet for the route computation of the routers it visits.
#[derive(Clone,Debug,PartialEq,Quantifiable)]
pub struct RouteInfo
{
	///The router the destination endpoints are attached to.
	pub destination_router: usize,
	///The endpoints the packet is addressed to.
	pub destination: DestinationSet,
	///The virtual network of the packet.
	pub vnet: usize,
	///Direction to follow in each torus dimension, `None` where no movement is required.
	///Chosen at the first hop by the adaptive torus routings and never changed.
	pub directions: Option<Vec<Option<Sign>>>,
	///Per dimension, whether the packet has crossed the wraparound link of that dimension. Once set it stays set.
	pub checkpoints: Vec<bool>,
	///Whether the chosen directions give a shortest path.
	pub minimal: bool,
	///Number of edges traversed (Router--Router).
	pub hops: usize,
}

impl RouteInfo
{
	pub fn new(destination_router:usize, destination:DestinationSet, vnet:usize) -> RouteInfo
	{
		RouteInfo{
			destination_router,
			destination,
			vnet,
			directions: None,
			checkpoints: vec![],
			minimal: false,
			hops: 0,
		}
	}
	///Whether the wraparound of `dimension` has been crossed.
	pub fn checkpoint(&self, dimension:usize) -> bool
	{
		self.checkpoints.get(dimension).copied().unwrap_or(false)
	}
	pub fn set_checkpoint(&mut self, dimension:usize)
	{
		if self.checkpoints.len()<=dimension
		{
			self.checkpoints.resize(dimension+1,false);
		}
		self.checkpoints[dimension]=true;
	}
}

///The static table of a router: for each virtual network and output port, the endpoints reachable through it, and a weight per output port.
///Entries are added in the order of the output ports, one `add_route` and one `add_weight` for each.
#[derive(Clone,Debug,Default,Quantifiable)]
pub struct RoutingTable
{
	///`routes[vnet][outport]`
	routes: Vec<Vec<DestinationSet>>,
	///`weights[outport]`
	weights: Vec<usize>,
}

impl RoutingTable
{
	pub fn new() -> RoutingTable
	{
		RoutingTable::default()
	}
	///Append the entry of the next output port. `entry[vnet]` are the endpoints reachable in that virtual network.
	pub fn add_route(&mut self, entry:Vec<DestinationSet>)
	{
		if entry.len() > self.routes.len()
		{
			self.routes.resize(entry.len(),vec![]);
		}
		for (vnet,destinations) in entry.into_iter().enumerate()
		{
			self.routes[vnet].push(destinations);
		}
	}
	///Append the weight of the next output port.
	pub fn add_weight(&mut self, weight:usize)
	{
		self.weights.push(weight);
	}
	///Number of output ports with an entry.
	pub fn len(&self) -> usize
	{
		self.routes.iter().map(|v|v.len()).max().unwrap_or(0)
	}
	pub fn is_empty(&self) -> bool
	{
		self.len()==0
	}
	///The output ports whose entry reaches `destination` with the minimum weight, in increasing index.
	///A reaching entry without weight is an error.
	pub fn candidates(&self, vnet:usize, destination:&DestinationSet) -> Result<Vec<usize>,Error>
	{
		let entries = match self.routes.get(vnet)
		{
			Some(entries) => entries,
			None => return Ok(vec![]),
		};
		let mut reaching:Vec<(usize,usize)> = Vec::with_capacity(entries.len());
		for (link,set) in entries.iter().enumerate()
		{
			if set.intersects(destination)
			{
				let weight = *self.weights.get(link).ok_or_else(||error!(missing_weight,link))?;
				reaching.push((link,weight));
			}
		}
		let minimum = match reaching.iter().map(|&(_,weight)|weight).min()
		{
			Some(minimum) => minimum,
			None => return Ok(vec![]),
		};
		Ok(reaching.into_iter().filter_map(|(link,weight)| if weight==minimum { Some(link) } else { None } ).collect())
	}
	///Select an output port for `destination`. Ordered virtual networks always take the first candidate.
	///Otherwise one random draw selects among the candidates.
	pub fn lookup(&self, vnet:usize, destination:&DestinationSet, ordered:bool, rng:&mut StdRng) -> Result<usize,Error>
	{
		let candidates = self.candidates(vnet,destination)?;
		if candidates.is_empty()
		{
			return Err(error!(missing_route,vnet,destination.iter().collect()).with_message("No route exists from this router.".to_string()));
		}
		let chosen = if ordered { 0 } else { rng.gen_range(0..candidates.len()) };
		trace!("table lookup vnet={} destination={:?} candidates={:?} chosen={}",vnet,destination,candidates,candidates[chosen]);
		Ok(candidates[chosen])
	}
}

///What a routing needs to know of the router computing the route.
pub struct RoutingEnvironment<'a>
{
	pub router_index: usize,
	pub table: &'a RoutingTable,
	///Whether the virtual network of the packet requires ordered delivery.
	pub ordered: bool,
	///The input port the packet entered by.
	pub inport: usize,
	pub inport_direction: PortDirection,
	pub outports: &'a DirectionMap,
	///The output ports of the router, to poll their free virtual channels.
	pub ports: &'a [OutputPort],
}

impl<'a> RoutingEnvironment<'a>
{
	///The index of the output port facing `direction`.
	pub fn outport(&self, direction:PortDirection) -> Result<usize,Error>
	{
		self.outports.index_of(&direction).ok_or_else(||error!(missing_direction,direction))
	}
}

///The result of a routing algorithm.
#[derive(Clone,Debug,PartialEq)]
pub struct RoutingDecision
{
	pub outport: usize,
	///How many output ports were compared before deciding. More than one means the decision depended on the load.
	pub polled_candidates: usize,
}

impl RoutingDecision
{
	pub fn direct(outport:usize) -> RoutingDecision
	{
		RoutingDecision{ outport, polled_candidates:1 }
	}
}

///A routing algorithm to select the output port toward a router other than the current one.
pub trait Routing : Quantifiable + Debug
{
	///Compute the output port. May fill the fields of `route` that the algorithm keeps for the packet lifetime.
	fn next(&self, route:&mut RouteInfo, environment:&RoutingEnvironment, rng:&mut StdRng) -> Result<RoutingDecision,Error>;
	///How the virtual channels of a virtual network are split to avoid deadlock.
	fn virtual_channel_partition(&self) -> VirtualChannelPartition;
	///How the port labels are read.
	fn port_family(&self) -> PortFamily
	{
		PortFamily::Cartesian
	}
	///The dimension whose wraparound link is used when leaving `router_index` toward `direction`, if any.
	fn wraparound_dimension(&self, _router_index:usize, _direction:&PortDirection) -> Option<usize>
	{
		None
	}
	///Number of routers of the network the algorithm moves in, when it is known.
	fn router_count(&self) -> Option<usize>
	{
		None
	}
}

///Geometric parameters of the network, as given in the router configuration.
#[derive(Clone,Debug,Default)]
pub struct NetworkGeometry
{
	pub torus_extents: Option<Vec<usize>>,
	pub mesh_columns: Option<usize>,
	pub mesh_rows: Option<usize>,
	pub ring_size: Option<usize>,
}

///The argument of a builder function for `Routing`s.
#[derive(Debug)]
pub struct RoutingBuilderArgument<'a>
{
	///A ConfigurationValue::Object defining the routing.
	pub cv: &'a ConfigurationValue,
	pub geometry: &'a NetworkGeometry,
}

///Build a routing from its configuration object: one of `Table`, `XY`, `Ring`, `DOR`, `GOAL` and `MINAD`.
pub fn new_routing(arg:RoutingBuilderArgument) -> Result<Box<dyn Routing>,Error>
{
	let name = arg.cv.object_name()?;
	let routing:Box<dyn Routing> = match name
	{
		"Table" => Box::new(TableRouting::new(arg)?),
		"XY" => Box::new(MeshXY::new(arg)?),
		"Ring" => Box::new(RingShortestArc::new(arg)?),
		"DOR" => Box::new(TorusDimensionOrder::new(arg)?),
		"GOAL" => Box::new(TorusAdaptive::new(arg,AdaptiveDirections::Probabilistic)?),
		"MINAD" => Box::new(TorusAdaptive::new(arg,AdaptiveDirections::Minimal)?),
		_ => return Err(error!(ill_formed_configuration,arg.cv.clone()).with_message(format!("Unknown routing {}",name))),
	};
	Ok(routing)
}

fn torus_from_geometry(arg:&RoutingBuilderArgument) -> Result<CartesianData,Error>
{
	let extents = arg.geometry.torus_extents.as_ref().ok_or_else(||error!(missing_configuration_field,"torus_extents".to_string()))?;
	if extents.is_empty() || extents.iter().any(|&side|side==0)
	{
		return Err(error!(ill_formed_configuration,arg.cv.clone()).with_message(format!("bad torus extents {:?}",extents)));
	}
	Ok(CartesianData::new(extents))
}

///Use the routing table for every packet.
#[derive(Debug,Quantifiable)]
pub struct TableRouting
{
}

impl Routing for TableRouting
{
	fn next(&self, route:&mut RouteInfo, environment:&RoutingEnvironment, rng:&mut StdRng) -> Result<RoutingDecision,Error>
	{
		let outport = environment.table.lookup(route.vnet,&route.destination,environment.ordered,rng)?;
		Ok(RoutingDecision::direct(outport))
	}
	fn virtual_channel_partition(&self) -> VirtualChannelPartition
	{
		VirtualChannelPartition::Whole
	}
}

impl TableRouting
{
	pub fn new(arg:RoutingBuilderArgument) -> Result<TableRouting,Error>
	{
		match_object!(arg.cv,"Table",_value,);
		Ok(TableRouting{})
	}
}

///Dimension order routing in a mesh, first X (East/West) then Y (North/South).
///Router `i` is at `x=i%columns`, `y=i/columns`.
#[derive(Debug,Quantifiable)]
pub struct MeshXY
{
	columns: usize,
	rows: Option<usize>,
}

impl Routing for MeshXY
{
	fn next(&self, route:&mut RouteInfo, environment:&RoutingEnvironment, _rng:&mut StdRng) -> Result<RoutingDecision,Error>
	{
		let (axis,sign) = match cartesian::xy_direction(environment.router_index,route.destination_router,self.columns)
		{
			Some(direction) => direction,
			None => panic!("XY routing from router {} to itself",environment.router_index),
		};
		let incoming = environment.inport_direction;
		match axis
		{
			//Going East the packet can only come from the local port or from the West.
			MeshAxis::X => assert!(incoming==PortDirection::Local || incoming==PortDirection::Mesh{axis:MeshAxis::X,sign:sign.opposite()},
				"XY routing at router {} going {} entered from {} by inport {}",environment.router_index,PortDirection::Mesh{axis,sign},incoming,environment.inport),
			MeshAxis::Y => assert!(incoming!=PortDirection::Mesh{axis:MeshAxis::Y,sign},
				"XY routing at router {} going {} entered from {} by inport {}",environment.router_index,PortDirection::Mesh{axis,sign},incoming,environment.inport),
		}
		let outport = environment.outport(PortDirection::Mesh{axis,sign})?;
		Ok(RoutingDecision::direct(outport))
	}
	fn virtual_channel_partition(&self) -> VirtualChannelPartition
	{
		VirtualChannelPartition::Whole
	}
	fn router_count(&self) -> Option<usize>
	{
		self.rows.map(|rows|rows*self.columns)
	}
}

impl MeshXY
{
	pub fn new(arg:RoutingBuilderArgument) -> Result<MeshXY,Error>
	{
		match_object!(arg.cv,"XY",_value,);
		let columns = arg.geometry.mesh_columns.ok_or_else(||error!(missing_configuration_field,"mesh_columns".to_string()))?;
		if columns==0 || arg.geometry.mesh_rows==Some(0)
		{
			return Err(error!(ill_formed_configuration,arg.cv.clone()).with_message("a mesh requires at least a row and a column".to_string()));
		}
		Ok(MeshXY{columns,rows:arg.geometry.mesh_rows})
	}
}

///Shortest arc in a ring of `size` routers. Half way or more goes West.
///Packets that have crossed the link between router `size-1` and router 0 use the lower half of the virtual channels.
#[derive(Debug,Quantifiable)]
pub struct RingShortestArc
{
	size: usize,
}

impl Routing for RingShortestArc
{
	fn next(&self, route:&mut RouteInfo, environment:&RoutingEnvironment, _rng:&mut StdRng) -> Result<RoutingDecision,Error>
	{
		let sign = match cartesian::ring_direction(environment.router_index,route.destination_router,self.size)
		{
			Some(sign) => sign,
			None => panic!("Ring routing from router {} to itself",environment.router_index),
		};
		let outport = environment.outport(PortDirection::Ring{sign})?;
		Ok(RoutingDecision::direct(outport))
	}
	fn virtual_channel_partition(&self) -> VirtualChannelPartition
	{
		VirtualChannelPartition::Halves
	}
	fn port_family(&self) -> PortFamily
	{
		PortFamily::Ring
	}
	fn router_count(&self) -> Option<usize>
	{
		Some(self.size)
	}
	fn wraparound_dimension(&self, router_index:usize, direction:&PortDirection) -> Option<usize>
	{
		match direction
		{
			PortDirection::Ring{sign:Sign::Negative} if router_index==0 => Some(0),
			PortDirection::Ring{sign:Sign::Positive} if router_index+1==self.size => Some(0),
			_ => None,
		}
	}
}

impl RingShortestArc
{
	pub fn new(arg:RoutingBuilderArgument) -> Result<RingShortestArc,Error>
	{
		match_object!(arg.cv,"Ring",_value,);
		let size = arg.geometry.ring_size.ok_or_else(||error!(missing_configuration_field,"ring_size".to_string()))?;
		if size==0
		{
			return Err(error!(ill_formed_configuration,arg.cv.clone()).with_message("a ring requires some router".to_string()));
		}
		Ok(RingShortestArc{size})
	}
}

fn torus_wraparound_dimension(torus:&CartesianData, router_index:usize, direction:&PortDirection) -> Option<usize>
{
	if let &PortDirection::TorusDimension{index,sign} = direction
	{
		if index < torus.dimensions() && torus.crosses_wraparound(index,torus.unpack(router_index)[index],sign)
		{
			return Some(index);
		}
	}
	None
}

///Dimension order in a torus. The first dimension with some offset is corrected by its shorter arc.
///Each dimension splits its virtual channels in halves according to its checkpoint.
#[derive(Debug,Quantifiable)]
pub struct TorusDimensionOrder
{
	torus: CartesianData,
}

impl Routing for TorusDimensionOrder
{
	fn next(&self, route:&mut RouteInfo, environment:&RoutingEnvironment, _rng:&mut StdRng) -> Result<RoutingDecision,Error>
	{
		let current = self.torus.unpack(environment.router_index);
		let target = self.torus.unpack(route.destination_router);
		let (index,sign) = match cartesian::dimension_order_direction(&self.torus,&current,&target)
		{
			Some(direction) => direction,
			None => panic!("DOR routing from router {} to itself",environment.router_index),
		};
		let outport = environment.outport(PortDirection::TorusDimension{index,sign})?;
		Ok(RoutingDecision::direct(outport))
	}
	fn virtual_channel_partition(&self) -> VirtualChannelPartition
	{
		VirtualChannelPartition::Halves
	}
	fn wraparound_dimension(&self, router_index:usize, direction:&PortDirection) -> Option<usize>
	{
		torus_wraparound_dimension(&self.torus,router_index,direction)
	}
	fn router_count(&self) -> Option<usize>
	{
		Some(self.torus.size)
	}
}

impl TorusDimensionOrder
{
	pub fn new(arg:RoutingBuilderArgument) -> Result<TorusDimensionOrder,Error>
	{
		match_object!(arg.cv,"DOR",_value,);
		let torus = torus_from_geometry(&arg)?;
		Ok(TorusDimensionOrder{torus})
	}
}

///How the adaptive torus routing fixes the direction of each dimension at the first hop.
#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub enum AdaptiveDirections
{
	///Positive with probability `1-offset/side`. Long offsets tend to go the other way around.
	Probabilistic,
	///Always the shorter arc, Negative when both arcs are equal.
	Minimal,
}

impl Quantifiable for AdaptiveDirections
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

///Adaptive routing in a torus. This is GOAL with probabilistic directions and MIN-AD with minimal directions.
///At the first hop a direction is fixed for each dimension. At every hop the candidates are the ports of the unresolved dimensions in their fixed direction,
///and the one with more free virtual channels is taken, the first in dimension order on ties.
///Virtual channels are split in thirds: the first third is always usable and the others according to the checkpoint of the dimension.
#[derive(Debug,Quantifiable)]
pub struct TorusAdaptive
{
	torus: CartesianData,
	directions: AdaptiveDirections,
}

impl Routing for TorusAdaptive
{
	fn next(&self, route:&mut RouteInfo, environment:&RoutingEnvironment, rng:&mut StdRng) -> Result<RoutingDecision,Error>
	{
		let current = self.torus.unpack(environment.router_index);
		let target = self.torus.unpack(route.destination_router);
		if route.directions.is_none()
		{
			self.choose_directions(route,&current,&target,rng);
		}
		let directions = route.directions.as_ref().ok_or_else(||error!(undetermined))?;
		let mut candidates = Vec::with_capacity(self.torus.dimensions());
		for dimension in 0..self.torus.dimensions()
		{
			if current[dimension]==target[dimension]
			{
				continue;
			}
			let sign = match directions.get(dimension).copied().flatten()
			{
				Some(sign) => sign,
				None => return Err(error!(undetermined).with_message(format!("dimension {} has offset from router {} to {} but no direction was chosen",dimension,environment.router_index,route.destination_router))),
			};
			candidates.push(environment.outport(PortDirection::TorusDimension{index:dimension,sign})?);
		}
		let context = SelectionContext{
			partition: self.virtual_channel_partition(),
			checkpoints: &route.checkpoints,
		};
		let mut best:Option<(usize,usize)> = None;
		for &outport in candidates.iter()
		{
			let port = environment.ports.get(outport).ok_or_else(||error!(undetermined).with_message(format!("there is no output port {}",outport)))?;
			let free = port.count_free_vc(route.vnet,&context);
			trace!("router {} polls outport {} ({}) with {} free virtual channels",environment.router_index,outport,port.direction(),free);
			let improves = match best
			{
				None => true,
				Some((_,best_free)) => free>best_free,
			};
			if improves
			{
				best=Some((outport,free));
			}
		}
		match best
		{
			Some((outport,_)) => Ok(RoutingDecision{outport,polled_candidates:candidates.len()}),
			None => panic!("adaptive torus routing from router {} to itself",environment.router_index),
		}
	}
	fn virtual_channel_partition(&self) -> VirtualChannelPartition
	{
		VirtualChannelPartition::Thirds
	}
	fn wraparound_dimension(&self, router_index:usize, direction:&PortDirection) -> Option<usize>
	{
		torus_wraparound_dimension(&self.torus,router_index,direction)
	}
	fn router_count(&self) -> Option<usize>
	{
		Some(self.torus.size)
	}
}

impl TorusAdaptive
{
	pub fn new(arg:RoutingBuilderArgument, directions:AdaptiveDirections) -> Result<TorusAdaptive,Error>
	{
		match_object!(arg.cv,["GOAL","MINAD"],_value,);
		let torus = torus_from_geometry(&arg)?;
		Ok(TorusAdaptive{torus,directions})
	}
	///Fix the direction of every dimension and whether the resulting path is minimal.
	///The probabilistic variant makes one draw per dimension with offset.
	fn choose_directions(&self, route:&mut RouteInfo, current:&[usize], target:&[usize], rng:&mut StdRng)
	{
		let mut minimal=true;
		let mut directions=Vec::with_capacity(self.torus.dimensions());
		for dimension in 0..self.torus.dimensions()
		{
			let side = self.torus.sides[dimension];
			let offset = self.torus.positive_offset(dimension,current[dimension],target[dimension]);
			if cartesian::shorter_arc(offset,side).is_none()
			{
				directions.push(None);
				continue;
			}
			let sign = match self.directions
			{
				//Exact half offsets go Negative.
				AdaptiveDirections::Minimal => if 2*offset<side { Sign::Positive } else { Sign::Negative },
				AdaptiveDirections::Probabilistic =>
				{
					let probability = cartesian::positive_probability(offset,side);
					if rng.gen_bool(probability) { Sign::Positive } else { Sign::Negative }
				},
			};
			if !cartesian::is_minimal_sign(offset,side,sign)
			{
				minimal=false;
			}
			directions.push(Some(sign));
		}
		trace!("directions {:?} chosen toward router {}, minimal={}",directions,route.destination_router,minimal);
		route.directions=Some(directions);
		route.minimal=minimal;
	}
}

///Statistics of the route computation since the last reset.
#[derive(Clone,Debug,Default,Quantifiable)]
pub struct RoutingStatistics
{
	///Calls to `outport_compute`.
	pub routed_packets: usize,
	///Packets for the current router, resolved by the table.
	pub local_deliveries: usize,
	///Decisions that compared more than one candidate port.
	pub adaptive_decisions: usize,
	///Packets whose directions were fixed by this router and are not minimal.
	pub non_minimal_paths: usize,
}

///The route computation unit of a router.
#[derive(Debug,Quantifiable)]
pub struct RouteComputation
{
	router_index: usize,
	routing: Box<dyn Routing>,
	table: RoutingTable,
	///`ordered_vnets[vnet]` is true if the virtual network requires ordered delivery. Missing entries are unordered.
	ordered_vnets: Vec<bool>,
	inports: DirectionMap,
	outports: DirectionMap,
	statistics: RoutingStatistics,
}

impl RouteComputation
{
	pub fn new(router_index:usize, routing:Box<dyn Routing>, ordered_vnets:Vec<bool>) -> RouteComputation
	{
		RouteComputation{
			router_index,
			routing,
			table: RoutingTable::new(),
			ordered_vnets,
			inports: DirectionMap::new(),
			outports: DirectionMap::new(),
			statistics: RoutingStatistics::default(),
		}
	}
	pub fn router_index(&self) -> usize
	{
		self.router_index
	}
	pub fn routing(&self) -> &dyn Routing
	{
		self.routing.as_ref()
	}
	pub fn table(&self) -> &RoutingTable
	{
		&self.table
	}
	///See `RoutingTable::add_route`.
	pub fn add_route(&mut self, entry:Vec<DestinationSet>)
	{
		self.table.add_route(entry);
	}
	///See `RoutingTable::add_weight`.
	pub fn add_weight(&mut self, weight:usize)
	{
		self.table.add_weight(weight);
	}
	pub fn add_in_direction(&mut self, direction:PortDirection, inport:usize)
	{
		self.inports.insert(direction,inport);
	}
	pub fn add_out_direction(&mut self, direction:PortDirection, outport:usize)
	{
		self.outports.insert(direction,outport);
	}
	pub fn inport_direction(&self, inport:usize) -> Option<PortDirection>
	{
		self.inports.direction_of(inport)
	}
	pub fn outport_direction(&self, outport:usize) -> Option<PortDirection>
	{
		self.outports.direction_of(outport)
	}
	pub fn outport_index(&self, direction:&PortDirection) -> Option<usize>
	{
		self.outports.index_of(direction)
	}
	pub fn is_ordered(&self, vnet:usize) -> bool
	{
		self.ordered_vnets.get(vnet).copied().unwrap_or(false)
	}
	///The eligibility rules `select_free_vc` must use for the packets routed here.
	pub fn selection_context<'a>(&self, route:&'a RouteInfo) -> SelectionContext<'a>
	{
		SelectionContext{
			partition: self.routing.virtual_channel_partition(),
			checkpoints: &route.checkpoints,
		}
	}
	///Compute the output port a packet must take. Packets for this router use the routing table; the rest use the routing algorithm.
	///`ports` are the output ports of the router, polled by the adaptive algorithms.
	pub fn outport_compute(&mut self, route:&mut RouteInfo, inport:usize, inport_direction:PortDirection, ports:&[OutputPort], rng:&mut StdRng) -> Result<usize,Error>
	{
		self.statistics.routed_packets+=1;
		let ordered = self.is_ordered(route.vnet);
		if route.destination_router==self.router_index
		{
			self.statistics.local_deliveries+=1;
			let outport = self.table.lookup(route.vnet,&route.destination,ordered,rng)?;
			trace!("router {} delivers locally by outport {}",self.router_index,outport);
			return Ok(outport);
		}
		let had_directions = route.directions.is_some();
		let environment = RoutingEnvironment{
			router_index: self.router_index,
			table: &self.table,
			ordered,
			inport,
			inport_direction,
			outports: &self.outports,
			ports,
		};
		let decision = self.routing.next(route,&environment,rng)?;
		if decision.polled_candidates>1
		{
			self.statistics.adaptive_decisions+=1;
		}
		if !had_directions && route.directions.is_some() && !route.minimal
		{
			self.statistics.non_minimal_paths+=1;
		}
		trace!("router {} routes packet for router {} vnet {} from inport {} ({}) to outport {}",self.router_index,route.destination_router,route.vnet,inport,inport_direction,decision.outport);
		Ok(decision.outport)
	}
	///The route information the packet carries to the router at the other side of `outport`.
	///Sets the checkpoint of a dimension when the hop crosses its wraparound link. Checkpoints are never cleared.
	pub fn next_hop_route_info(&self, route:&RouteInfo, outport:usize) -> RouteInfo
	{
		let mut next = route.clone();
		if let Some(direction) = self.outports.direction_of(outport)
		{
			if direction!=PortDirection::Local
			{
				next.hops+=1;
			}
			if let Some(dimension) = self.routing.wraparound_dimension(self.router_index,&direction)
			{
				next.set_checkpoint(dimension);
			}
		}
		next
	}
	pub fn statistics(&self) -> &RoutingStatistics
	{
		&self.statistics
	}
	pub fn reset_statistics(&mut self)
	{
		self.statistics=RoutingStatistics::default();
	}
}
