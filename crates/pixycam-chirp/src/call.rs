use bytes::BytesMut;

use crate::codec::encode_arguments;
use crate::error::{ChirpError, Result};
use crate::schema::CommandSchema;
use crate::value::Value;

/// A call whose arguments have been checked against its schema.
///
/// Only [`CallBuilder::build`] produces one, so anything that reaches the
/// encoder already has the right count and kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call<'s> {
    schema: CommandSchema<'s>,
    args: Vec<Value>,
}

impl<'s> Call<'s> {
    /// Start building a call for `schema`.
    #[allow(clippy::new_ret_no_self)]
    pub fn new(schema: CommandSchema<'s>) -> CallBuilder<'s> {
        CallBuilder {
            schema,
            args: Vec::with_capacity(schema.args.len()),
        }
    }

    pub fn name(&self) -> &'s str {
        self.schema.name
    }

    pub fn schema(&self) -> &CommandSchema<'s> {
        &self.schema
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Encode the out-argument list, sentinel included.
    pub fn encode_args(&self, dst: &mut BytesMut) {
        encode_arguments(&self.args, dst);
    }
}

/// Collects arguments for a [`Call`].
#[derive(Debug, Clone)]
pub struct CallBuilder<'s> {
    schema: CommandSchema<'s>,
    args: Vec<Value>,
}

impl<'s> CallBuilder<'s> {
    /// Append the next positional argument.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Check the arguments against the schema.
    pub fn build(self) -> Result<Call<'s>> {
        let schema = self.schema;
        if self.args.len() != schema.args.len() {
            return Err(ChirpError::ArgumentCount {
                command: schema.name.to_string(),
                expected: schema.args.len(),
                found: self.args.len(),
            });
        }
        for (index, (arg, &expected)) in self.args.iter().zip(schema.args).enumerate() {
            if arg.kind() != expected {
                return Err(ChirpError::ArgumentKind {
                    command: schema.name.to_string(),
                    index,
                    expected,
                    found: arg.kind(),
                });
            }
        }
        Ok(Call {
            schema,
            args: self.args,
        })
    }
}
