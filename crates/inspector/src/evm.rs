use revm::{
    inspector_handle_register, primitives::EnvWithHandlerCfg, Context, Database, Evm, EvmContext,
    Handler,
};
use statemon_recorder::Monitor;

use crate::{StateChangeInspector, StorageLayout};

/// Creates a new EVM whose storage accesses are recorded into `monitor`, naming slots through
/// `layout`. The monitor stays borrowed until the EVM is dropped.
#[inline]
pub fn new_monitored_evm<'a, DB, L>(
    db: DB,
    env: EnvWithHandlerCfg,
    monitor: &'a mut Monitor,
    layout: L,
) -> Evm<'a, StateChangeInspector<'a, L>, DB>
where
    DB: Database,
    L: StorageLayout,
{
    let EnvWithHandlerCfg { env, handler_cfg } = env;

    let inspector = StateChangeInspector::new(monitor, layout);
    let context = Context::new(EvmContext::new_with_env(db, env), inspector);
    let mut handler = Handler::new(handler_cfg);
    handler.append_handler_register_plain(inspector_handle_register);
    Evm::new(context, handler)
}
