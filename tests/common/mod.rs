#![allow(dead_code)]

use caminos_noc::config_parser::ConfigurationValue;
use caminos_noc::router::{Router,RouterBuilderArgument};
use caminos_noc::routing::{RouteInfo,DestinationSet};

pub fn number(x:usize) -> ConfigurationValue
{
	ConfigurationValue::Number(x as f64)
}

pub fn labels(ports:&[&str]) -> ConfigurationValue
{
	ConfigurationValue::Array(ports.iter().map(|label|ConfigurationValue::Literal(label.to_string())).collect())
}

pub fn numbers(values:&[usize]) -> ConfigurationValue
{
	ConfigurationValue::Array(values.iter().map(|&x|number(x)).collect())
}

///The labels of a torus router: `Local` and then, per dimension, `dim{k}_pos` and `dim{k}_neg`.
pub fn torus_labels(dimensions:usize) -> Vec<String>
{
	let mut labels=vec!["Local".to_string()];
	for dimension in 0..dimensions
	{
		labels.push(format!("dim{}_pos",dimension));
		labels.push(format!("dim{}_neg",dimension));
	}
	labels
}

pub fn router_configuration(routing:&str, virtual_networks:usize, virtual_channels_per_vnet:usize, ports:&[&str], extra:Vec<(String,ConfigurationValue)>) -> ConfigurationValue
{
	let mut pairs=vec![
		("virtual_networks".to_string(),number(virtual_networks)),
		("virtual_channels_per_vnet".to_string(),number(virtual_channels_per_vnet)),
		("buffer_depth".to_string(),number(4)),
		("routing".to_string(),ConfigurationValue::Object(routing.to_string(),vec![])),
		("ports".to_string(),labels(ports)),
	];
	pairs.extend(extra);
	ConfigurationValue::Object("Router".to_string(),pairs)
}

pub fn build(router_index:usize, cv:&ConfigurationValue) -> Router
{
	Router::new(RouterBuilderArgument{router_index,cv}).expect("a valid router configuration")
}

///A router of a torus with all its ports and a single virtual network.
pub fn torus_router(routing:&str, router_index:usize, extents:&[usize], virtual_channels_per_vnet:usize) -> Router
{
	let owned=torus_labels(extents.len());
	let ports:Vec<&str>=owned.iter().map(|s|s.as_str()).collect();
	let cv=router_configuration(routing,1,virtual_channels_per_vnet,&ports,vec![
		("torus_extents".to_string(),numbers(extents)),
	]);
	build(router_index,&cv)
}

pub fn mesh_router(router_index:usize, columns:usize, ports:&[&str]) -> Router
{
	let cv=router_configuration("XY",1,2,ports,vec![
		("mesh_columns".to_string(),number(columns)),
		("mesh_rows".to_string(),number(columns)),
	]);
	build(router_index,&cv)
}

pub fn ring_router(router_index:usize, size:usize, virtual_channels_per_vnet:usize) -> Router
{
	let cv=router_configuration("Ring",1,virtual_channels_per_vnet,&["Local","East","West"],vec![
		("ring_size".to_string(),number(size)),
	]);
	build(router_index,&cv)
}

///A packet for the endpoint with the same index as its router.
pub fn route_to(destination_router:usize, vnet:usize) -> RouteInfo
{
	RouteInfo::new(destination_router,DestinationSet::single(destination_router),vnet)
}

///The value of a numeric field of a statistics object.
pub fn statistic(cv:&ConfigurationValue, field:&str) -> f64
{
	match cv
	{
		ConfigurationValue::Object(_,pairs) => match pairs.iter().find(|(name,_)|name==field)
		{
			Some((_,ConfigurationValue::Number(x))) => *x,
			other => panic!("field {} is not a number: {:?}",field,other),
		},
		_ => panic!("statistics should be an object, got {}",cv),
	}
}
