mod common;
use ::rand::{rngs::StdRng};
use rand::SeedableRng;
use caminos_noc::config_parser::ConfigurationValue;
use caminos_noc::error::ErrorKind;
use caminos_noc::router::Router;
use caminos_noc::routing::{RouteInfo,DestinationSet};
use caminos_noc::topology::{PortDirection,Sign,MeshAxis};
use common::*;

fn outport_direction(router:&Router, outport:usize) -> PortDirection
{
	router.route_computation().outport_direction(outport).expect("a registered outport")
}

#[test]
fn mesh_resolves_x_before_y()
{
	let mut rng=StdRng::seed_from_u64(10u64);
	let mut corner=mesh_router(0,4,&["Local","East","North"]);
	let mut route=route_to(15,0);
	let outport=corner.outport_compute(&mut route,0,&mut rng).expect("route");
	assert_eq!(outport_direction(&corner,outport),PortDirection::Mesh{axis:MeshAxis::X,sign:Sign::Positive});
	//Router 3 is at the end of the first row; coming from the West it turns North.
	let mut edge=mesh_router(3,4,&["Local","West","North"]);
	let mut route=route_to(15,0);
	let outport=edge.outport_compute(&mut route,1,&mut rng).expect("route");
	assert_eq!(outport_direction(&edge,outport),PortDirection::Mesh{axis:MeshAxis::Y,sign:Sign::Positive});
	assert_eq!(route.hops,0);
}

#[test]
#[should_panic(expected="going East entered from East by inport 1")]
fn mesh_rejects_inconsistent_inport()
{
	let mut rng=StdRng::seed_from_u64(10u64);
	let mut router=mesh_router(1,4,&["Local","East","West","North"]);
	let mut route=route_to(3,0);
	//Going East a packet cannot have entered from the East.
	let _ = router.outport_compute(&mut route,1,&mut rng);
}

#[test]
fn ring_shortest_arc()
{
	let mut rng=StdRng::seed_from_u64(10u64);
	let mut router=ring_router(0,8,2);
	let expected=[(5,Sign::Negative),(3,Sign::Positive),(4,Sign::Negative),(1,Sign::Positive),(7,Sign::Negative)];
	for &(destination,sign) in expected.iter()
	{
		let mut route=route_to(destination,0);
		let outport=router.outport_compute(&mut route,0,&mut rng).expect("route");
		assert_eq!(outport_direction(&router,outport),PortDirection::Ring{sign},"toward router {}",destination);
	}
}

#[test]
fn ring_checkpoint_is_kept()
{
	let mut rng=StdRng::seed_from_u64(10u64);
	let size=8;
	let mut route=route_to(5,0);
	let mut current=0;
	let mut seen_wrap=false;
	while current!=5
	{
		let mut router=ring_router(current,size,4);
		let outport=router.outport_compute(&mut route,0,&mut rng).expect("route");
		//Wrapped packets take the lower half of the pool.
		let vc=router.select_free_vc(outport,&route).expect("a free channel");
		assert_eq!(vc, if route.checkpoint(0) { 0 } else { 2 });
		let next=router.next_hop_route_info(&route,outport);
		if current==0
		{
			assert!(next.checkpoint(0),"leaving router 0 by the West crosses the wraparound");
		}
		if seen_wrap
		{
			assert!(next.checkpoint(0));
		}
		seen_wrap=next.checkpoint(0);
		route=next;
		current=(current+size-1)%size;
	}
	assert_eq!(route.hops,3);
	assert!(route.checkpoint(0));
}

#[test]
fn torus_dimension_order_takes_shorter_arc()
{
	let mut rng=StdRng::seed_from_u64(10u64);
	let mut router=torus_router("DOR",0,&[4,4],2);
	let mut route=route_to(3,0);
	let outport=router.outport_compute(&mut route,0,&mut rng).expect("route");
	assert_eq!(outport_direction(&router,outport),PortDirection::TorusDimension{index:0,sign:Sign::Negative});
	let next=router.next_hop_route_info(&route,outport);
	assert_eq!(next.checkpoints,vec![true]);
	//Exact half goes positive. Router 10 is (2,2).
	let mut route=route_to(10,0);
	let outport=router.outport_compute(&mut route,0,&mut rng).expect("route");
	assert_eq!(outport_direction(&router,outport),PortDirection::TorusDimension{index:0,sign:Sign::Positive});
	//Router 8 is (0,2); dimension 0 is already resolved.
	let mut route=route_to(8,0);
	let outport=router.outport_compute(&mut route,0,&mut rng).expect("route");
	assert_eq!(outport_direction(&router,outport),PortDirection::TorusDimension{index:1,sign:Sign::Positive});
}

#[test]
fn missing_direction_is_an_error()
{
	let mut rng=StdRng::seed_from_u64(10u64);
	let cv=router_configuration("DOR",1,2,&["Local","dim0_pos","dim0_neg"],vec![
		("torus_extents".to_string(),numbers(&[4,4])),
	]);
	let mut router=build(0,&cv);
	let mut route=route_to(4,0);
	let error=router.outport_compute(&mut route,0,&mut rng).expect_err("there is no dimension 1 port");
	match error.kind
	{
		ErrorKind::MissingDirection{direction} => assert_eq!(direction,PortDirection::TorusDimension{index:1,sign:Sign::Positive}),
		ref kind => panic!("unexpected error {:?}",kind),
	}
}

#[test]
fn goal_directions_are_fixed_at_first_hop()
{
	let mut rng=StdRng::seed_from_u64(10u64);
	let extents=[4,4];
	let mut router=torus_router("GOAL",0,&extents,3);
	//Router 10 is (2,2), at half the ring in both dimensions.
	let mut route=route_to(10,0);
	assert_eq!(route.directions,None);
	let outport=router.outport_compute(&mut route,0,&mut rng).expect("route");
	let directions=route.directions.clone().expect("directions after the first hop");
	assert_eq!(directions.len(),2);
	assert!(directions.iter().all(|d|d.is_some()));
	assert!(route.minimal);
	for _ in 0..20
	{
		router.outport_compute(&mut route,0,&mut rng).expect("route");
		assert_eq!(route.directions.as_ref(),Some(&directions));
	}
	//At the next router the same directions are followed.
	let direction=outport_direction(&router,outport);
	let next_router_index = match direction
	{
		PortDirection::TorusDimension{index:0,sign:Sign::Positive} => 1,
		PortDirection::TorusDimension{index:0,sign:Sign::Negative} => 3,
		PortDirection::TorusDimension{index:1,sign:Sign::Positive} => 4,
		PortDirection::TorusDimension{index:1,sign:Sign::Negative} => 12,
		other => panic!("unexpected direction {}",other),
	};
	let mut next=router.next_hop_route_info(&route,outport);
	assert_eq!(next.hops,1);
	let mut neighbour=torus_router("GOAL",next_router_index,&extents,3);
	let inport=neighbour.route_computation().outport_index(&PortDirection::TorusDimension{index:direction.dimension().expect("dimensional"),sign:direction.sign().expect("signed").opposite()}).expect("inport");
	let outport=neighbour.outport_compute(&mut next,inport,&mut rng).expect("route");
	assert_eq!(next.directions.as_ref(),Some(&directions));
	let taken=outport_direction(&neighbour,outport);
	let dimension=taken.dimension().expect("dimensional");
	assert_eq!(taken.sign(),directions[dimension]);
}

#[test]
fn goal_marks_non_minimal_draws()
{
	let mut rng=StdRng::seed_from_u64(7u64);
	let mut router=torus_router("GOAL",0,&[4,4],3);
	let mut positives=0;
	let total=400;
	for _ in 0..total
	{
		//Router 3 is (3,0): an offset of 3 of 4, positive with probability 1/4.
		let mut route=route_to(3,0);
		router.outport_compute(&mut route,0,&mut rng).expect("route");
		let directions=route.directions.clone().expect("directions");
		assert_eq!(directions[1],None);
		match directions[0]
		{
			Some(Sign::Positive) =>
			{
				positives+=1;
				assert!(!route.minimal);
			},
			Some(Sign::Negative) => assert!(route.minimal),
			None => panic!("dimension 0 has offset"),
		}
	}
	assert!(positives>50 && positives<150,"{} positive draws of {}",positives,total);
	let statistics=router.aggregate_statistics(None,10).expect("statistics");
	assert_eq!(statistic(&statistics,"non_minimal_paths") as usize,positives);
	assert_eq!(statistic(&statistics,"routed_packets") as usize,total);
}

#[test]
fn minimal_adaptive_prefers_free_channels()
{
	let mut rng=StdRng::seed_from_u64(10u64);
	let mut router=torus_router("MINAD",0,&[4,4],6);
	//Router 5 is (1,1): candidates dim0_pos and dim1_pos.
	let mut route=route_to(5,0);
	let outport=router.outport_compute(&mut route,0,&mut rng).expect("route");
	assert!(route.minimal);
	assert_eq!(route.directions,Some(vec![Some(Sign::Positive),Some(Sign::Positive)]));
	assert_eq!(outport_direction(&router,outport),PortDirection::TorusDimension{index:0,sign:Sign::Positive},"ties go to the first dimension");
	assert_eq!(router.count_free_vc(outport,&route),4);
	router.select_free_vc(outport,&route).expect("free channel");
	let second=router.outport_compute(&mut route,0,&mut rng).expect("route");
	assert_eq!(outport_direction(&router,second),PortDirection::TorusDimension{index:1,sign:Sign::Positive});
	//Once dimension 1 is resolved only dimension 0 remains, whatever its load.
	let mut resolved=route_to(1,0);
	for _ in 0..4
	{
		router.select_free_vc(outport,&resolved);
	}
	assert_eq!(router.count_free_vc(outport,&resolved),0);
	let only=router.outport_compute(&mut resolved,0,&mut rng).expect("route");
	assert_eq!(only,outport);
	let statistics=router.aggregate_statistics(None,1).expect("statistics");
	assert_eq!(statistic(&statistics,"adaptive_decisions"),2.0);
}

fn table_router(weights:&[usize]) -> Router
{
	let entry=|endpoints:&[usize]| ConfigurationValue::Array(vec![numbers(endpoints),numbers(endpoints)]);
	let cv=router_configuration("Table",2,2,&["Local","East","West"],vec![
		("ordered_vnets".to_string(),ConfigurationValue::Array(vec![ConfigurationValue::True,ConfigurationValue::False])),
		("routes".to_string(),ConfigurationValue::Array(vec![entry(&[0]),entry(&[5,6]),entry(&[5])])),
		("weights".to_string(),numbers(weights)),
	]);
	build(0,&cv)
}

#[test]
fn table_ordered_and_unordered()
{
	let mut rng=StdRng::seed_from_u64(10u64);
	let mut router=table_router(&[1,1,1]);
	let destination:DestinationSet=vec![5].into_iter().collect();
	let mut counts=[0usize;3];
	for _ in 0..2000
	{
		let mut ordered=RouteInfo::new(2,destination.clone(),0);
		assert_eq!(router.outport_compute(&mut ordered,0,&mut rng).expect("route"),1);
		let mut unordered=RouteInfo::new(2,destination.clone(),1);
		counts[router.outport_compute(&mut unordered,0,&mut rng).expect("route")]+=1;
	}
	assert_eq!(counts[0],0);
	assert!(counts[1]>800 && counts[1]<1200,"{:?}",counts);
	assert_eq!(counts[1]+counts[2],2000);
	//Only port 1 reaches endpoint 6.
	let mut route=RouteInfo::new(2,DestinationSet::single(6),1);
	assert_eq!(router.outport_compute(&mut route,0,&mut rng).expect("route"),1);
}

#[test]
fn table_prefers_lighter_entries()
{
	let mut rng=StdRng::seed_from_u64(10u64);
	let mut router=table_router(&[1,3,2]);
	for vnet in 0..2
	{
		let mut route=RouteInfo::new(2,DestinationSet::single(5),vnet);
		assert_eq!(router.outport_compute(&mut route,0,&mut rng).expect("route"),2);
	}
	let mut unknown=RouteInfo::new(2,DestinationSet::single(9),0);
	let error=router.outport_compute(&mut unknown,0,&mut rng).expect_err("endpoint 9 is not reachable");
	assert!(matches!(error.kind,ErrorKind::MissingRoute{vnet:0,..}));
}

#[test]
fn local_destinations_use_the_table()
{
	let mut rng=StdRng::seed_from_u64(10u64);
	let empty=ConfigurationValue::Array(vec![numbers(&[])]);
	let cv=router_configuration("GOAL",1,3,&["Local","dim0_pos","dim0_neg","dim1_pos","dim1_neg"],vec![
		("torus_extents".to_string(),numbers(&[4,4])),
		("routes".to_string(),ConfigurationValue::Array(vec![
			ConfigurationValue::Array(vec![numbers(&[0])]),
			empty.clone(),empty.clone(),empty.clone(),empty,
		])),
	]);
	let mut router=build(0,&cv);
	let mut route=route_to(0,0);
	assert_eq!(router.outport_compute(&mut route,0,&mut rng).expect("local delivery"),0);
	assert_eq!(route.directions,None);
	let next=router.next_hop_route_info(&route,0);
	assert_eq!(next.hops,0);
	//Without a table there is no way to deliver.
	let mut bare=torus_router("GOAL",0,&[4,4],3);
	let error=bare.outport_compute(&mut route_to(0,0),0,&mut rng).expect_err("no table");
	assert!(matches!(error.kind,ErrorKind::MissingRoute{..}));
}

#[test]
fn configuration_defects_are_errors()
{
	use caminos_noc::router::RouterBuilderArgument;
	let few_channels=router_configuration("GOAL",1,2,&["Local"],vec![
		("torus_extents".to_string(),numbers(&[4,4])),
	]);
	assert!(Router::new(RouterBuilderArgument{router_index:0,cv:&few_channels}).is_err());
	let bad_label=router_configuration("Ring",1,2,&["Local","North"],vec![
		("ring_size".to_string(),number(8)),
	]);
	let error=Router::new(RouterBuilderArgument{router_index:0,cv:&bad_label}).err().expect("North is not a ring port");
	assert!(matches!(error.kind,ErrorKind::UnknownDirectionLabel{..}));
	let no_columns=router_configuration("XY",1,2,&["Local"],vec![]);
	let error=Router::new(RouterBuilderArgument{router_index:0,cv:&no_columns}).err().expect("columns required");
	assert!(matches!(error.kind,ErrorKind::MissingConfigurationField{..}));
	//Router indices beyond the network.
	let ring=router_configuration("Ring",1,2,&["Local","East","West"],vec![
		("ring_size".to_string(),number(8)),
	]);
	let error=Router::new(RouterBuilderArgument{router_index:20,cv:&ring}).err().expect("a ring of 8 has no router 20");
	assert!(matches!(error.kind,ErrorKind::IllFormedConfiguration{..}));
	assert!(Router::new(RouterBuilderArgument{router_index:8,cv:&ring}).is_err());
	assert!(Router::new(RouterBuilderArgument{router_index:7,cv:&ring}).is_ok());
	let torus=router_configuration("MINAD",1,3,&["Local"],vec![
		("torus_extents".to_string(),numbers(&[4,4])),
	]);
	assert!(Router::new(RouterBuilderArgument{router_index:16,cv:&torus}).is_err());
	assert!(Router::new(RouterBuilderArgument{router_index:15,cv:&torus}).is_ok());
	let mesh=router_configuration("XY",1,2,&["Local"],vec![
		("mesh_columns".to_string(),number(4)),
		("mesh_rows".to_string(),number(4)),
	]);
	assert!(Router::new(RouterBuilderArgument{router_index:16,cv:&mesh}).is_err());
	//Without rows the extent of the mesh is unknown.
	let open_mesh=router_configuration("XY",1,2,&["Local"],vec![
		("mesh_columns".to_string(),number(4)),
	]);
	assert!(Router::new(RouterBuilderArgument{router_index:16,cv:&open_mesh}).is_ok());
}

#[test]
fn minimal_adaptive_breaks_half_ties_negative()
{
	let mut rng=StdRng::seed_from_u64(10u64);
	let mut router=torus_router("MINAD",0,&[4,4],3);
	//Router 2 is (2,0): both arcs of dimension 0 are two hops long.
	let mut route=route_to(2,0);
	let outport=router.outport_compute(&mut route,0,&mut rng).expect("route");
	assert_eq!(route.directions,Some(vec![Some(Sign::Negative),None]));
	assert!(route.minimal);
	assert_eq!(outport_direction(&router,outport),PortDirection::TorusDimension{index:0,sign:Sign::Negative});
	//Dimension order keeps the positive arc on the same tie.
	let mut dor=torus_router("DOR",0,&[4,4],2);
	let mut route=route_to(2,0);
	let outport=dor.outport_compute(&mut route,0,&mut rng).expect("route");
	assert_eq!(outport_direction(&dor,outport),PortDirection::TorusDimension{index:0,sign:Sign::Positive});
}
