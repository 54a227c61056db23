/*!

Helpers to read the configuration of a router.

A configuration is written in the object notation of `config_parser` and parsed with [parse]. The typed accessors of `ConfigurationValue` return an `Error` with kind `IllFormedConfiguration` when the value is not of the requested type, so builders can use them with `?`.

*/

use crate::config_parser::{self,ConfigurationValue};
use crate::error::Error;
use crate::error;

///Parse the source text of a configuration into a value.
pub fn parse(source:&str) -> Result<ConfigurationValue,Error>
{
	match config_parser::parse(source)
	{
		Err(x) => Err(error!(could_not_parse_configuration).with_message(format!("error parsing configuration: {:?}",x))),
		Ok(config_parser::Token::Value(value)) => Ok(value),
		Ok(x) => Err(error!(could_not_parse_configuration).with_message(format!("the configuration is not a value: {:?}",x))),
	}
}

///Iterate over the fields of a `ConfigurationValue::Object` whose name must be `$name` (or one in a list of names).
///Each field is bound to `$valueid` and matched against the given arms by its name.
///Unknown fields and non-objects cause the enclosing function to return an `IllFormedConfiguration` error.
///The field `legend_name` is always accepted and ignored.
#[macro_export]
macro_rules! match_object{
	($cv:expr, $name:literal, $valueid:ident, $($arm:tt)* ) => {{
		$crate::match_object!($cv,[$name],$valueid,$($arm)*)
	}};
	($cv:expr, $names:expr, $valueid:ident, $($arm:tt)* ) => {{
		if let &$crate::config_parser::ConfigurationValue::Object(ref cv_name, ref cv_pairs) = $cv
		{
			if !$names.iter().any(|&x|x==cv_name)
			{
				return Err($crate::error!(ill_formed_configuration,$cv.clone()).with_message(format!("Trying to create either of `{:?}` object from `{}`",$names,cv_name)));
			}
			for &(ref name,ref $valueid) in cv_pairs
			{
				match AsRef::<str>::as_ref(&name)
				{
					$( $arm )*
					"legend_name" => (),
					_ => return Err($crate::error!(ill_formed_configuration,$cv.clone()).with_message(format!("Nothing to do with field {} in {}",name,$names.get(0).unwrap_or_else(||&"None")))),
				}
			}
		}
		else
		{
			return Err($crate::error!(ill_formed_configuration,$cv.clone()).with_message(format!("Trying to create a {} from a non-Object",$names.get(0).unwrap_or_else(||&"None"))));
		}
	}};
}

impl ConfigurationValue
{
	pub fn as_bool(&self) -> Result<bool,Error>
	{
		match self
		{
			&ConfigurationValue::True => Ok(true),
			&ConfigurationValue::False => Ok(false),
			_ => Err(error!(ill_formed_configuration, self.clone() )),
		}
	}
	pub fn as_str(&self) -> Result<&str,Error>
	{
		match self
		{
			&ConfigurationValue::Literal(ref s) => Ok(s),
			_ => Err(error!(ill_formed_configuration, self.clone() )),
		}
	}
	pub fn as_f64(&self) -> Result<f64,Error>
	{
		match self
		{
			&ConfigurationValue::Number(x) => Ok(x),
			_ => Err(error!(ill_formed_configuration, self.clone() )),
		}
	}
	///Read a non-negative integer. Numbers with a fractional part are rejected.
	pub fn as_usize(&self) -> Result<usize,Error>
	{
		match self
		{
			&ConfigurationValue::Number(x) =>{
				let res =  x as usize;
				// Casting from a float to an integer will round the float towards zero
				// overflows and underflows will saturate
				let y = res as f64;
				let tolerance = 1e-5;
				if x-y > tolerance || x-y < -tolerance {
					Err(error!(ill_formed_configuration, self.clone()))
				} else {
					Ok( res )
				}
			},
			_ => Err(error!(ill_formed_configuration, self.clone() )),
		}
	}
	pub fn as_array(&self) -> Result<&Vec<ConfigurationValue>,Error>
	{
		match self
		{
			&ConfigurationValue::Array(ref x) => Ok(x),
			_ => Err(error!(ill_formed_configuration, self.clone() )),
		}
	}
	///The name of an object, as in `Router` for `Router{..}`.
	pub fn object_name(&self) -> Result<&str,Error>
	{
		match self
		{
			&ConfigurationValue::Object(ref name,_) => Ok(name),
			_ => Err(error!(ill_formed_configuration, self.clone() )),
		}
	}
}

///Read an array of integers, such as the extents of a torus.
pub fn values_to_usize(value:&ConfigurationValue) -> Result<Vec<usize>,Error>
{
	value.as_array()?.iter().map(|v|v.as_usize()).collect()
}

///Read an array of booleans, such as the ordering requirement of each virtual network.
pub fn values_to_bool(value:&ConfigurationValue) -> Result<Vec<bool>,Error>
{
	value.as_array()?.iter().map(|v|v.as_bool()).collect()
}

///Read an array of literals, such as the direction labels of the ports.
pub fn values_to_string(value:&ConfigurationValue) -> Result<Vec<String>,Error>
{
	value.as_array()?.iter().map(|v|v.as_str().map(|s|s.to_string())).collect()
}
