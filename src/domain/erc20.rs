//! Minimal ERC-20 interface: the allowance/approve/balance/transfer calls
//! the engine submits, plus the Transfer event for post-swap diagnostics.

use alloy_sol_types::sol;

sol! {
    #[sol(rpc)]
    contract IERC20 {
        event Transfer(address indexed from, address indexed to, uint256 value);

        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
        function balanceOf(address account) external view returns (uint256);
        function transfer(address to, uint256 amount) external returns (bool);
    }
}
