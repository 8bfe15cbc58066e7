//! ABI definitions for every call shape the guard recognizes, using alloy's
//! `sol!` macro.

use alloy::sol;

sol! {
    /// ERC-20 token interface (state-changing subset).
    interface IERC20 {
        function transfer(address to, uint256 amount) external returns (bool);
        function transferFrom(address from, address to, uint256 amount) external returns (bool);
        function approve(address spender, uint256 amount) external returns (bool);
    }

    /// Uniswap V2 Router02 token-to-token swaps.
    interface IUniswapV2Router {
        function swapExactTokensForTokens(
            uint256 amountIn,
            uint256 amountOutMin,
            address[] calldata path,
            address to,
            uint256 deadline
        ) external returns (uint256[] memory amounts);

        function swapTokensForExactTokens(
            uint256 amountOut,
            uint256 amountInMax,
            address[] calldata path,
            address to,
            uint256 deadline
        ) external returns (uint256[] memory amounts);

        function swapExactTokensForTokensSupportingFeeOnTransferTokens(
            uint256 amountIn,
            uint256 amountOutMin,
            address[] calldata path,
            address to,
            uint256 deadline
        ) external;
    }

    /// Uniswap V3 SwapRouter02 (no deadline field).
    interface IV3SwapRouter {
        struct ExactInputSingleParams {
            address tokenIn;
            address tokenOut;
            uint24 fee;
            address recipient;
            uint256 amountIn;
            uint256 amountOutMinimum;
            uint160 sqrtPriceLimitX96;
        }

        struct ExactInputParams {
            bytes path;
            address recipient;
            uint256 amountIn;
            uint256 amountOutMinimum;
        }

        struct ExactOutputSingleParams {
            address tokenIn;
            address tokenOut;
            uint24 fee;
            address recipient;
            uint256 amountOut;
            uint256 amountInMaximum;
            uint160 sqrtPriceLimitX96;
        }

        struct ExactOutputParams {
            bytes path;
            address recipient;
            uint256 amountOut;
            uint256 amountInMaximum;
        }

        function exactInputSingle(ExactInputSingleParams calldata params) external payable returns (uint256 amountOut);
        function exactInput(ExactInputParams calldata params) external payable returns (uint256 amountOut);
        function exactOutputSingle(ExactOutputSingleParams calldata params) external payable returns (uint256 amountIn);
        function exactOutput(ExactOutputParams calldata params) external payable returns (uint256 amountIn);
    }

    /// Aave V3-style lending pool.
    interface ILendingPool {
        function supply(address asset, uint256 amount, address onBehalfOf, uint16 referralCode) external;
        function withdraw(address asset, uint256 amount, address to) external returns (uint256);
    }

    /// ERC-4626 tokenized vault.
    interface IERC4626 {
        function deposit(uint256 assets, address receiver) external returns (uint256 shares);
        function mint(uint256 shares, address receiver) external returns (uint256 assets);
        function withdraw(uint256 assets, address receiver, address owner) external returns (uint256 shares);
        function redeem(uint256 shares, address receiver, address owner) external returns (uint256 assets);
    }

    /// ERC-7540 asynchronous vault: requests plus controller-aware claims.
    interface IERC7540 {
        function requestDeposit(uint256 assets, address controller, address owner) external returns (uint256 requestId);
        function requestRedeem(uint256 shares, address controller, address owner) external returns (uint256 requestId);
        function deposit(uint256 assets, address receiver, address controller) external returns (uint256 shares);
        function mint(uint256 shares, address receiver, address controller) external returns (uint256 assets);
    }

    /// Cross-chain rebalance relay. `action` is 0 (burn) or 1 (mint).
    interface IRebalanceRelay {
        struct RebalanceMessage {
            uint256 rebalanceId;
            uint8 action;
            address token;
            uint128 amount;
            uint256 srcChainId;
            uint256 dstChainId;
        }

        function rebalance(RebalanceMessage calldata message) external;
    }

    /// Exchange account contract. Balances live on the exchange ledger.
    interface IExchangeAccount {
        struct DelegateSigner {
            bytes32 brokerHash;
            address delegateSigner;
        }

        struct AccountDeposit {
            bytes32 accountId;
            bytes32 brokerHash;
            bytes32 tokenHash;
            uint128 amount;
        }

        struct AccountWithdraw {
            bytes32 accountId;
            bytes32 brokerHash;
            bytes32 tokenHash;
            uint128 amount;
        }

        function delegateSigner(DelegateSigner calldata data) external;
        function deposit(AccountDeposit calldata data) external payable;
        function withdraw(AccountWithdraw calldata data) external;
    }
}
