/*!

This module is for managing errors in the code of caminos-noc. To avoid invoking `panic!` in favor of a more graceful exit. Cases that should never happen, such as a violation of the credit protocol, are kept as `panic!`.

Configuration defects (a destination no routing table entry covers, a direction missing from the port maps, an ill-formed configuration object) are returned as `Err(Error)`, so the caller can abort the run with a diagnostic.

Instead of `expect` or `unwrap_or_else` try
* `ok_or_else` like in `.ok_or_else( ||error!(missing_direction,direction) )?;`
* `map_err` like in `.map_err(|e|Error::could_not_parse_configuration(source_location!()).with_message(format!("{:?}",e)))?;`

*/

use std::fmt::{Display,Formatter};
use crate::config_parser::ConfigurationValue;
use crate::topology::PortDirection;

/// The main Error class to be used in each `Result(Whatever,Error)`.
/// It contains the code source of the error and its kind.
/// An arbitrary `String` message can be optionally attached.
#[derive(Debug)]
pub struct Error
{
	pub source_location: SourceLocation,
	pub kind: ErrorKind,
	pub message: Option<String>,
}

/// A source code location where an error occurred.
/// Contains the values of the macros `std::{file,line,column}`.
#[derive(Debug)]
pub struct SourceLocation
{
	pub file: &'static str,
	pub line: u32,
	pub column: u32,
}

#[derive(Debug)]
pub enum ErrorKind
{
	/// A configuration value that does not make sense where it was found.
	IllFormedConfiguration{
		value: ConfigurationValue,
	},
	/// An object lacked a field that is required.
	MissingConfigurationField{
		field: String,
	},
	/// The configuration source text could not be parsed.
	CouldNotParseConfiguration,
	/// No entry of the routing table of the virtual network intersects the destination.
	MissingRoute{
		vnet: usize,
		destination: Vec<usize>,
	},
	/// A routing table entry that reaches the destination was given no weight.
	MissingWeight{
		outport: usize,
	},
	/// The routing selected a direction that the router has no port for.
	MissingDirection{
		direction: PortDirection,
	},
	/// A direction label that does not describe any known kind of port.
	UnknownDirectionLabel{
		label: String,
	},
	/// Any other error. Better to add new types than to use this thing.
	Undetermined,
}

// source_location!()
#[macro_export]
macro_rules! source_location{
	() => {
		$crate::error::SourceLocation{
			file: file!(),
			line: line!(),
			column: column!(),
		}
	}
}

/// Build an error at the current source location.
/// `error!(missing_direction,direction)` is `Error::missing_direction(source_location!(),direction)`.
#[macro_export]
macro_rules! error{
	($kind:ident) => {
		$crate::error::Error::$kind( $crate::source_location!() )
	};
	($kind:ident, $($args:expr),* ) => {
		$crate::error::Error::$kind( $crate::source_location!(), $($args),* )
	};
}

use ErrorKind::*;

impl Error
{
	pub fn new(source_location:SourceLocation, kind:ErrorKind) -> Error
	{
		Error{
			source_location,
			kind,
			message:None,
		}
	}
	pub fn with_message(mut self,message:String) -> Error
	{
		self.message=Some(message);
		self
	}
	pub fn ill_formed_configuration(source_location:SourceLocation,value:ConfigurationValue)->Error
	{
		Error{
			source_location,
			kind: IllFormedConfiguration{
				value,
			},
			message:None,
		}
	}
	pub fn missing_configuration_field(source_location:SourceLocation,field:String)->Error
	{
		Error{
			source_location,
			kind: MissingConfigurationField{
				field,
			},
			message:None,
		}
	}
	pub fn could_not_parse_configuration(source_location:SourceLocation)->Error
	{
		Error{
			source_location,
			kind: CouldNotParseConfiguration,
			message:None,
		}
	}
	/// example call: `error!(missing_route,vnet,destination.iter().collect())`.
	pub fn missing_route(source_location:SourceLocation,vnet:usize,destination:Vec<usize>)->Error
	{
		Error{
			source_location,
			kind: MissingRoute{
				vnet,
				destination,
			},
			message:None,
		}
	}
	pub fn missing_weight(source_location:SourceLocation,outport:usize)->Error
	{
		Error{
			source_location,
			kind: MissingWeight{
				outport,
			},
			message:None,
		}
	}
	pub fn missing_direction(source_location:SourceLocation,direction:PortDirection)->Error
	{
		Error{
			source_location,
			kind: MissingDirection{
				direction,
			},
			message:None,
		}
	}
	pub fn unknown_direction_label(source_location:SourceLocation,label:String)->Error
	{
		Error{
			source_location,
			kind: UnknownDirectionLabel{
				label,
			},
			message:None,
		}
	}
	pub fn undetermined(source_location:SourceLocation)->Error
	{
		Error{
			source_location,
			kind: Undetermined,
			message:None,
		}
	}
}


impl Display for Error
{
	fn fmt(&self, formatter: &mut Formatter<'_>) -> std::result::Result<(), std::fmt::Error>
	{
		let Error{source_location:location,kind,message} = self;
		writeln!(formatter,"Error at file {} at line {} column {}.",location.file,location.line,location.column)?;
		if let Some(text) = message
		{
			writeln!(formatter,"{}",text)?;
		}
		kind.fmt(formatter)?;
		Ok(())
	}
}

impl Display for ErrorKind
{
	fn fmt(&self, formatter: &mut Formatter<'_>) -> std::result::Result<(), std::fmt::Error>
	{
		match self
		{
			IllFormedConfiguration{value} =>
			{
				writeln!(formatter,"IllFormedConfiguration error: the following value could not be understood:\n{}",value)?;
			},
			MissingConfigurationField{field} =>
			{
				writeln!(formatter,"MissingConfigurationField error: the required field `{}` was not given.",field)?;
			},
			CouldNotParseConfiguration =>
			{
				writeln!(formatter,"CouldNotParseConfiguration error: the configuration source could not be parsed.")?;
			},
			MissingRoute{vnet,destination} =>
			{
				writeln!(formatter,"MissingRoute error: no route exists from this router for destination {:?} in vnet {}.",destination,vnet)?;
			},
			MissingWeight{outport} =>
			{
				writeln!(formatter,"MissingWeight error: the routing table entry of outport {} has no weight.",outport)?;
			},
			MissingDirection{direction} =>
			{
				writeln!(formatter,"MissingDirection error: the router has no port in direction {} ({:?}).",direction.label(),direction)?;
			},
			UnknownDirectionLabel{label} =>
			{
				writeln!(formatter,"UnknownDirectionLabel error: `{}` does not name a port direction.",label)?;
			},
			Undetermined =>
			{
				writeln!(formatter,"Undetermined error: A generic error. The concrete error should be more specified.")?;
			},
		}
		Ok(())
	}
}

impl std::error::Error for Error {}
