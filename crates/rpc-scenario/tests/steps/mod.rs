mod rpc_steps;
