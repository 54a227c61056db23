/*!

A [Router] puts together the route computation and the output ports of a router of the network.

It is built from a `Router` configuration object, see the crate documentation. The external allocator asks [Router::outport_compute] for the port of each new packet and then [Router::select_free_vc] for a channel in it. The external scheduler hands the events the router requests back to [Router::process].

*/

pub mod virtual_channel;
pub mod output_port;

use std::rc::{Rc};
use std::collections::VecDeque;
use std::mem::{size_of};
use ::rand::rngs::StdRng;
use log::debug;
use quantifiable_derive::Quantifiable;//the derive macro
use crate::config_parser::ConfigurationValue;
use crate::config::{values_to_usize,values_to_bool,values_to_string};
use crate::error::Error;
use crate::event::{Event,EventGeneration,Time};
use crate::quantify::{Quantifiable,human_bytes};
use crate::routing::{new_routing,RoutingBuilderArgument,NetworkGeometry,RouteComputation,RouteInfo,DestinationSet};
use crate::topology::PortDirection;
use crate::Flit;
use crate::{error,match_object};
use self::output_port::{OutputPort,VirtualChannelPartition};

///An unbounded queue of flits.
pub struct Buffer
{
	pub flits: VecDeque<Rc<Flit>>,
}

impl Buffer
{
	pub fn new() -> Buffer
	{
		Buffer{ flits: VecDeque::new() }
	}
	pub fn push(&mut self, flit:Rc<Flit>)
	{
		self.flits.push_back(flit);
	}
	pub fn pop(&mut self) -> Option<Rc<Flit>>
	{
		self.flits.pop_front()
	}
	pub fn front(&self) -> Option<Rc<Flit>>
	{
		self.flits.front().cloned()
	}
	///How many flits are currently in the buffer.
	pub fn len(&self) -> usize
	{
		self.flits.len()
	}
	pub fn is_empty(&self) -> bool
	{
		self.flits.is_empty()
	}
	pub fn iter(&self) -> impl Iterator<Item=&Rc<Flit>>
	{
		self.flits.iter()
	}
}

impl Quantifiable for Buffer
{
	fn total_memory(&self) -> usize
	{
		//We add +1 beacause one hole in the implementation of VecDeque
		return size_of::<Buffer>() + (self.flits.capacity()+1)*size_of::<Rc<Flit>>();
	}
	fn print_memory_breakdown(&self)
	{
		unimplemented!();
	}
	fn forecast_total_memory(&self) -> usize
	{
		unimplemented!();
	}
}

///A message sent back by the next router when a slot of a virtual channel is released.
///With `is_free_signal` the packet holding the channel has left it entirely and the channel can be given to another packet.
#[derive(Clone,Debug,PartialEq,Quantifiable)]
pub struct CreditMessage
{
	pub virtual_channel: usize,
	pub is_free_signal: bool,
}

///The reverse link carrying credit messages to an output port, each one with the cycle it arrives.
#[derive(Debug,Default,Quantifiable)]
pub struct CreditLink
{
	pending: VecDeque<(Time,CreditMessage)>,
}

impl CreditLink
{
	pub fn new() -> CreditLink
	{
		CreditLink::default()
	}
	///Put a message on the link, to be ready at cycle `arrival`. Messages are kept by arrival.
	pub fn send(&mut self, message:CreditMessage, arrival:Time)
	{
		let position = self.pending.iter().position(|&(time,_)|time>arrival).unwrap_or(self.pending.len());
		self.pending.insert(position,(arrival,message));
	}
	///Whether some message has arrived by `cycle`.
	pub fn is_ready(&self, cycle:Time) -> bool
	{
		match self.pending.front()
		{
			Some(&(arrival,_)) => arrival<=cycle,
			None => false,
		}
	}
	///Extract the first message arrived by `cycle`.
	pub fn consume(&mut self, cycle:Time) -> Option<CreditMessage>
	{
		if self.is_ready(cycle)
		{
			self.pending.pop_front().map(|(_,message)|message)
		}
		else
		{
			None
		}
	}
	///Messages still on the link, arrived or not.
	pub fn len(&self) -> usize
	{
		self.pending.len()
	}
	pub fn is_empty(&self) -> bool
	{
		self.pending.is_empty()
	}
}

///The argument of the builder of routers.
#[derive(Debug)]
pub struct RouterBuilderArgument<'a>
{
	///The index of the router being created.
	pub router_index: usize,
	///A ConfigurationValue::Object defining the router.
	pub cv: &'a ConfigurationValue,
}

///The route computation and the output ports of a router.
#[derive(Quantifiable)]
pub struct Router
{
	///The index of the router in the network.
	index: usize,
	virtual_networks: usize,
	route_computation: RouteComputation,
	output_ports: Vec<OutputPort>,
	///The cycle in which statistics were last reset.
	statistics_begin_cycle: Time,
}

impl Router
{
	pub fn new(arg:RouterBuilderArgument) -> Result<Router,Error>
	{
		let mut virtual_networks=None;
		let mut virtual_channels_per_vnet=None;
		let mut buffer_depth=None;
		let mut routing=None;
		let mut geometry=NetworkGeometry::default();
		let mut ordered_vnets=vec![];
		let mut ports=None;
		let mut inports=None;
		let mut routes=None;
		let mut weights=None;
		match_object!(arg.cv,"Router",value,
			"virtual_networks" => virtual_networks=Some(value.as_usize()?),
			"virtual_channels_per_vnet" => virtual_channels_per_vnet=Some(value.as_usize()?),
			"buffer_depth" => buffer_depth=Some(value.as_usize()?),
			"routing" => routing=Some(value.clone()),
			"torus_extents" => geometry.torus_extents=Some(values_to_usize(value)?),
			"mesh_columns" => geometry.mesh_columns=Some(value.as_usize()?),
			"mesh_rows" => geometry.mesh_rows=Some(value.as_usize()?),
			"ring_size" => geometry.ring_size=Some(value.as_usize()?),
			"ordered_vnets" => ordered_vnets=values_to_bool(value)?,
			"ports" => ports=Some(values_to_string(value)?),
			"inports" => inports=Some(values_to_string(value)?),
			"routes" => routes=Some(value.as_array()?.clone()),
			"weights" => weights=Some(values_to_usize(value)?),
		);
		let virtual_networks=virtual_networks.ok_or_else(||error!(missing_configuration_field,"virtual_networks".to_string()))?;
		let virtual_channels_per_vnet=virtual_channels_per_vnet.ok_or_else(||error!(missing_configuration_field,"virtual_channels_per_vnet".to_string()))?;
		let buffer_depth=buffer_depth.ok_or_else(||error!(missing_configuration_field,"buffer_depth".to_string()))?;
		let routing=routing.ok_or_else(||error!(missing_configuration_field,"routing".to_string()))?;
		let ports=ports.ok_or_else(||error!(missing_configuration_field,"ports".to_string()))?;
		let inports=inports.unwrap_or_else(||ports.clone());
		let routing=new_routing(RoutingBuilderArgument{cv:&routing,geometry:&geometry})?;
		if let Some(size) = routing.router_count()
		{
			if arg.router_index>=size
			{
				return Err(error!(ill_formed_configuration,arg.cv.clone()).with_message(format!("router {} is outside a network of {} routers",arg.router_index,size)));
			}
		}
		let minimum_channels = match routing.virtual_channel_partition()
		{
			VirtualChannelPartition::Whole => 1,
			VirtualChannelPartition::Halves => 2,
			VirtualChannelPartition::Thirds => 3,
		};
		if virtual_channels_per_vnet<minimum_channels
		{
			return Err(error!(ill_formed_configuration,arg.cv.clone()).with_message(format!("the routing requires at least {} virtual channels per virtual network, but {} were given",minimum_channels,virtual_channels_per_vnet)));
		}
		let family = routing.port_family();
		let mut route_computation = RouteComputation::new(arg.router_index,routing,ordered_vnets);
		let mut output_ports = Vec::with_capacity(ports.len());
		for (index,label) in ports.iter().enumerate()
		{
			let direction = PortDirection::from_label(label,family)?;
			route_computation.add_out_direction(direction,index);
			output_ports.push(OutputPort::new(index,direction,virtual_networks,virtual_channels_per_vnet,buffer_depth));
		}
		for (index,label) in inports.iter().enumerate()
		{
			route_computation.add_in_direction(PortDirection::from_label(label,family)?,index);
		}
		if let Some(routes) = routes
		{
			if routes.len()!=ports.len()
			{
				return Err(error!(ill_formed_configuration,ConfigurationValue::Array(routes.clone())).with_message(format!("there are {} route entries for {} ports",routes.len(),ports.len())));
			}
			let weights = weights.unwrap_or_else(||vec![1;ports.len()]);
			if weights.len()!=ports.len()
			{
				return Err(error!(ill_formed_configuration,arg.cv.clone()).with_message(format!("there are {} weights for {} ports",weights.len(),ports.len())));
			}
			for (entry,weight) in routes.iter().zip(weights.into_iter())
			{
				let per_vnet = entry.as_array()?.iter().map(|endpoints|->Result<DestinationSet,Error>{
					Ok(values_to_usize(endpoints)?.into_iter().collect())
				}).collect::<Result<Vec<DestinationSet>,Error>>()?;
				route_computation.add_route(per_vnet);
				route_computation.add_weight(weight);
			}
		}
		let router = Router{
			index: arg.router_index,
			virtual_networks,
			route_computation,
			output_ports,
			statistics_begin_cycle: 0,
		};
		debug!("router {} built with {} ports, using {}",router.index,router.output_ports.len(),human_bytes(router.total_memory()));
		Ok(router)
	}
	pub fn index(&self) -> usize
	{
		self.index
	}
	pub fn virtual_networks(&self) -> usize
	{
		self.virtual_networks
	}
	pub fn num_ports(&self) -> usize
	{
		self.output_ports.len()
	}
	pub fn output_port(&self, outport:usize) -> &OutputPort
	{
		&self.output_ports[outport]
	}
	pub fn output_port_mut(&mut self, outport:usize) -> &mut OutputPort
	{
		&mut self.output_ports[outport]
	}
	pub fn output_ports(&self) -> &[OutputPort]
	{
		&self.output_ports
	}
	pub fn route_computation(&self) -> &RouteComputation
	{
		&self.route_computation
	}
	///To fill the routing table and the direction maps after building the router.
	pub fn route_computation_mut(&mut self) -> &mut RouteComputation
	{
		&mut self.route_computation
	}
	///The output port for a packet that arrived by `inport`.
	pub fn outport_compute(&mut self, route:&mut RouteInfo, inport:usize, rng:&mut StdRng) -> Result<usize,Error>
	{
		let inport_direction = self.route_computation.inport_direction(inport).ok_or_else(||error!(undetermined).with_message(format!("router {} has no input port {}",self.index,inport)))?;
		self.route_computation.outport_compute(route,inport,inport_direction,&self.output_ports,rng)
	}
	///See `RouteComputation::next_hop_route_info`.
	pub fn next_hop_route_info(&self, route:&RouteInfo, outport:usize) -> RouteInfo
	{
		self.route_computation.next_hop_route_info(route,outport)
	}
	///Take a free channel of `outport` eligible for the packet of `route`.
	pub fn select_free_vc(&mut self, outport:usize, route:&RouteInfo) -> Option<usize>
	{
		let context = self.route_computation.selection_context(route);
		self.output_ports[outport].select_free_vc(route.vnet,&context)
	}
	pub fn count_free_vc(&self, outport:usize, route:&RouteInfo) -> usize
	{
		let context = self.route_computation.selection_context(route);
		self.output_ports[outport].count_free_vc(route.vnet,&context)
	}
	pub fn has_free_vc(&self, outport:usize, route:&RouteInfo) -> bool
	{
		let context = self.route_computation.selection_context(route);
		self.output_ports[outport].has_free_vc(route.vnet,&context)
	}
	///Send a flit by `outport`, which must hold credit in the flit channel. Returns the link traversal to schedule.
	pub fn send_flit(&mut self, outport:usize, flit:Rc<Flit>) -> EventGeneration
	{
		let port = &mut self.output_ports[outport];
		if let Some(vc) = *flit.virtual_channel.borrow()
		{
			port.decrement_credit(vc);
		}
		port.insert_flit(flit)
	}
	///Process an event requested by this router.
	pub fn process(&mut self, event:&Event, cycle:Time) -> Vec<EventGeneration>
	{
		match event
		{
			&Event::CreditWakeup{port} => self.output_ports[port].wakeup(cycle),
			//The link attached to the port takes the flits from `out_queue`.
			&Event::LinkTraversal{..} => vec![],
		}
	}
	///Build the statistics of this router added to those of the previous routers.
	///In the first router `previous=None`.
	pub fn aggregate_statistics(&self, previous:Option<ConfigurationValue>, cycle:Time) -> Result<ConfigurationValue,Error>
	{
		let routing = self.route_computation.statistics();
		let forwarded:Vec<usize> = self.output_ports.iter().map(|port|port.statistics_forwarded_flits()).collect();
		let credits:usize = self.output_ports.iter().map(|port|port.statistics_received_credits()).sum();
		let free_signals:usize = self.output_ports.iter().map(|port|port.statistics_free_signals()).sum();
		let number = |x:usize| ConfigurationValue::Number(x as f64);
		let mut pairs = vec![
			(String::from("routed_packets"),number(routing.routed_packets)),
			(String::from("local_deliveries"),number(routing.local_deliveries)),
			(String::from("adaptive_decisions"),number(routing.adaptive_decisions)),
			(String::from("non_minimal_paths"),number(routing.non_minimal_paths)),
			(String::from("forwarded_flits"),number(forwarded.iter().sum())),
			(String::from("received_credits"),number(credits)),
			(String::from("free_signals"),number(free_signals)),
			(String::from("forwarded_flits_per_port"),ConfigurationValue::Array(forwarded.iter().map(|&x|number(x)).collect())),
			(String::from("cycles"),number((cycle-self.statistics_begin_cycle) as usize)),
		];
		if let Some(previous)=previous
		{
			if let ConfigurationValue::Object(ref cv_name,ref previous_pairs) = previous
			{
				if cv_name!="Router"
				{
					return Err(error!(ill_formed_configuration,previous.clone()).with_message(format!("incompatible statistics, should be `Router` object not `{}`",cv_name)));
				}
				for (name,value) in previous_pairs.iter()
				{
					if name=="cycles"
					{
						continue;
					}
					if let Some(current) = pairs.iter_mut().find(|(current_name,_)|current_name==name)
					{
						add_statistic(&mut current.1,value)?;
					}
				}
			}
			else
			{
				return Err(error!(ill_formed_configuration,previous.clone()).with_message("statistics of a router must be an object".to_string()));
			}
		}
		Ok(ConfigurationValue::Object(String::from("Router"),pairs))
	}
	///Clears all collected statistics.
	pub fn reset_statistics(&mut self, next_cycle:Time)
	{
		self.statistics_begin_cycle=next_cycle;
		self.route_computation.reset_statistics();
		for port in self.output_ports.iter_mut()
		{
			port.reset_statistics();
		}
	}
}

///Add a previous statistic to the current one. Arrays are added element by element; the longer array keeps its tail.
fn add_statistic(current:&mut ConfigurationValue, previous:&ConfigurationValue) -> Result<(),Error>
{
	match (current,previous)
	{
		(&mut ConfigurationValue::Number(ref mut x),&ConfigurationValue::Number(y)) => *x+=y,
		(&mut ConfigurationValue::Array(ref mut xs),&ConfigurationValue::Array(ref ys)) =>
		{
			for (index,y) in ys.iter().enumerate()
			{
				if index<xs.len()
				{
					add_statistic(&mut xs[index],y)?;
				}
				else
				{
					xs.push(y.clone());
				}
			}
		},
		(_,previous) => return Err(error!(ill_formed_configuration,previous.clone()).with_message("The value cannot be added".to_string())),
	}
	Ok(())
}
