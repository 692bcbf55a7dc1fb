//! Solidity bindings for the smart account.

use alloy_sol_types::sol;

sol! {
    interface IAgwAccount {
        function listHooks(bool isValidation) external view returns (address[] memory hookList);
        function addModule(bytes calldata moduleAndData) external;
    }
}
