pub mod combiner;
pub mod error;
pub mod factory;
pub mod lookup;
pub mod name;
pub mod request;
pub mod resolver;
pub mod response;
pub mod transport;

pub use combiner::{combine, AggregateResult};
pub use error::HookError;
pub use factory::{HookFactory, HookRunner};
pub use lookup::{discover_all, find, DirectoryListing, HookDescriptor};
pub use name::{CustomHook, HookName, HookPolicy};
pub use request::{CompletionStatus, HookPayload, HookRequest, CLIENT_VERSION};
pub use resolver::{
    resolve, HookDirectory, HookDirectoryProvider, HookScope, ScopeRoot, StateDirectories,
    StaticDirectories, GLOBAL_ROOT_KEY, HOOKS_SUBPATH,
};
pub use response::{decode, HookResponse};
pub use transport::{HookTransport, ProcessOutput};
