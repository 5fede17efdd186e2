pub mod lookup;

pub use lookup::{
    CnameLookupUseCase, HostLookupUseCase, IpAddrLookupUseCase, MxLookupUseCase, NsLookupUseCase,
    PortLookupUseCase, ReverseLookupUseCase, SrvLookupUseCase, TxtLookupUseCase,
};
